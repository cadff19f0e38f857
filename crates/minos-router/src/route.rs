//! REST actions and the routes that reach them.

use std::fmt;
use std::str::FromStr;

use http::Method;

/// One of the seven canonical REST actions a controller implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// `GET /resource`
    Index,
    /// `GET /resource/new`
    New,
    /// `POST /resource`
    Create,
    /// `GET /resource/:resourceId`
    Show,
    /// `GET /resource/:resourceId/edit`
    Edit,
    /// `PUT /resource/:resourceId`
    Update,
    /// `DELETE /resource/:resourceId`
    Destroy,
}

impl Action {
    /// All actions, in route-table order.
    pub const ALL: [Action; 7] = [
        Action::Index,
        Action::New,
        Action::Create,
        Action::Show,
        Action::Edit,
        Action::Update,
        Action::Destroy,
    ];

    /// The action name as it appears in logs and request metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::New => "new",
            Self::Create => "create",
            Self::Show => "show",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// A `(method, url pattern, action)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// HTTP method.
    pub method: Method,
    /// URL pattern with `:name` parameters.
    pub url: String,
    /// Controller action that handles the route.
    pub action: Action,
}

impl Route {
    /// Creates a route.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>, action: Action) -> Self {
        Self {
            method,
            url: url.into(),
            action,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.method, self.url, self.action)
    }
}
