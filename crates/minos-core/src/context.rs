//! Per-request dispatch metadata.
//!
//! The dispatcher attaches a [`RequestContext`] to every request before the
//! filter chain runs. Controllers read it when rendering, logging and
//! reporting errors.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::identifier;

/// Header carrying a client-supplied browser correlation id.
pub const BROWSER_CONTEXT_HEADER: &str = "browser-context-id";

/// Prefix of generated browser correlation ids.
pub const BROWSER_ID_PREFIX: &str = "browser.";

/// The controller and action a request was dispatched to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerRef {
    /// Capitalized parts joined, e.g. `FooBar`.
    pub name: String,
    /// Action name, e.g. `show`.
    pub action: String,
    /// Resource segments of the route, e.g. `["foo", "bar"]`.
    pub parts: Vec<String>,
}

impl ControllerRef {
    /// Builds a reference from route segments, deriving the display name.
    ///
    /// # Example
    ///
    /// ```
    /// use minos_core::ControllerRef;
    ///
    /// let c = ControllerRef::from_parts(vec!["foo".into(), "bar".into()], "show");
    /// assert_eq!(c.name, "FooBar");
    /// ```
    #[must_use]
    pub fn from_parts(parts: Vec<String>, action: impl Into<String>) -> Self {
        Self {
            name: parts.iter().map(|p| capitalize(p)).collect(),
            action: action.into(),
            parts,
        }
    }
}

/// Per-request context.
///
/// Serializes to `{page, controller: {name, action, parts}, requestToken,
/// browserId}` for template values and logs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    page: String,
    controller: ControllerRef,
    #[serde(skip)]
    started_at: Instant,
    request_token: String,
    browser_id: String,
}

impl RequestContext {
    /// Creates a context with a fresh request token and browser id.
    #[must_use]
    pub fn new(page: impl Into<String>, controller: ControllerRef, started_at: Instant) -> Self {
        Self {
            page: page.into(),
            controller,
            started_at,
            request_token: identifier::generate_default(),
            browser_id: generate_browser_id(),
        }
    }

    /// Uses a client-supplied browser id.
    #[must_use]
    pub fn with_browser_id(mut self, browser_id: impl Into<String>) -> Self {
        self.browser_id = browser_id.into();
        self
    }

    /// Overrides the request token.
    #[must_use]
    pub fn with_request_token(mut self, token: impl Into<String>) -> Self {
        self.request_token = token.into();
        self
    }

    /// Request path without query string or surrounding slashes.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Dispatched controller.
    #[must_use]
    pub const fn controller(&self) -> &ControllerRef {
        &self.controller
    }

    /// Controller display name.
    #[must_use]
    pub fn controller_name(&self) -> &str {
        &self.controller.name
    }

    /// Action name.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.controller.action
    }

    /// When dispatch began.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since dispatch began.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Random request token.
    #[must_use]
    pub fn request_token(&self) -> &str {
        &self.request_token
    }

    /// Browser correlation id.
    #[must_use]
    pub fn browser_id(&self) -> &str {
        &self.browser_id
    }
}

/// Generates a browser id: [`BROWSER_ID_PREFIX`] followed by a dashless UUID.
#[must_use]
pub fn generate_browser_id() -> String {
    format!("{BROWSER_ID_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
