//! Outbound response model.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, IntoHeaderName, CONTENT_TYPE, LOCATION};
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MinosError, MinosResult};

/// Outcome of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The action produced the response.
    Handled,
    /// The action declined; the next matching route gets the request.
    Next,
}

/// A response being built by filters and actions.
///
/// `locals` holds response-local values written by rendering, so later code
/// on the same request can read what a template saw.
///
/// # Example
///
/// ```
/// use minos_core::Response;
/// use http::StatusCode;
///
/// let mut response = Response::new();
/// response.set_status(StatusCode::CREATED);
/// response.send_json(&serde_json::json!({"ok": true})).unwrap();
///
/// assert!(response.is_sent());
/// let http = response.into_http();
/// assert_eq!(http.status(), StatusCode::CREATED);
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
    locals: Map<String, Value>,
}

impl Response {
    /// Creates an unsent `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
            locals: Map::new(),
        }
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Sets a header, replacing earlier values.
    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Response body, once sent.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Whether a body has been sent.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        self.body.is_some()
    }

    /// Response-local values.
    #[must_use]
    pub const fn locals(&self) -> &Map<String, Value> {
        &self.locals
    }

    /// Mutable response-local values.
    pub fn locals_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.locals
    }

    /// Sends an HTML body.
    pub fn send(&mut self, body: impl Into<Bytes>) {
        self.send_with_type(body, "text/html; charset=utf-8");
    }

    /// Sends a plain-text body.
    pub fn send_text(&mut self, body: impl Into<Bytes>) {
        self.send_with_type(body, "text/plain; charset=utf-8");
    }

    /// Serializes and sends a JSON body.
    pub fn send_json<T: Serialize + ?Sized>(&mut self, value: &T) -> MinosResult<()> {
        let body = serde_json::to_vec(value)
            .map_err(|e| MinosError::action(format!("could not serialize response: {e}")))?;
        self.send_with_type(body, "application/json");
        Ok(())
    }

    /// Sends a `302 Found` redirect.
    pub fn redirect(&mut self, location: &str) -> MinosResult<()> {
        let value = HeaderValue::from_str(location)
            .map_err(|e| MinosError::action(format!("invalid redirect location: {e}")))?;
        self.status = StatusCode::FOUND;
        self.headers.insert(LOCATION, value);
        self.body = Some(Bytes::new());
        Ok(())
    }

    fn send_with_type(&mut self, body: impl Into<Bytes>, content_type: &'static str) {
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        self.body = Some(body.into());
    }

    /// Converts into an `http` response. An unsent response has an empty body.
    #[must_use]
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(self.body.unwrap_or_default());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
