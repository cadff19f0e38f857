//! Error types for Minos.
//!
//! [`MinosError`] is the single error type flowing through filters, controller
//! actions, rendering and dispatch. Every failure on a request path ends up in
//! the controller's error handler as one of these variants.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using [`MinosError`].
pub type MinosResult<T> = Result<T, MinosError>;

/// Standard error type for Minos.
///
/// # Example
///
/// ```
/// use minos_core::{MinosError, MinosResult};
///
/// fn find_user(id: &str) -> MinosResult<String> {
///     if id.is_empty() {
///         return Err(MinosError::action("missing user id"));
///     }
///     Ok(format!("user {id}"))
/// }
///
/// assert!(find_user("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum MinosError {
    /// A controller action failed.
    #[error("{0}")]
    Action(String),

    /// A filter rejected the request. No later filter ran.
    #[error("filter '{filter}' rejected the request: {source}")]
    FilterRejected {
        /// Name of the rejecting filter.
        filter: String,
        /// The filter's own error.
        #[source]
        source: Box<MinosError>,
    },

    /// The filter chain and action did not finish in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A filter or action panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// The template engine failed.
    #[error("could not render template '{template}': {message}")]
    Render {
        /// Template being rendered.
        template: String,
        /// Engine error message.
        message: String,
    },

    /// Marker for a render failure whose error response was already sent.
    #[error("render error already handled")]
    RenderHandled,

    /// A controller module could not be loaded.
    #[error("error while loading controller '{path}': {message}")]
    ControllerLoad {
        /// Source path of the controller.
        path: String,
        /// Cause.
        message: String,
    },

    /// A filter or template mixin module could not be loaded.
    #[error("error while loading module '{path}': {message}")]
    ModuleLoad {
        /// Source path of the module.
        path: String,
        /// Cause.
        message: String,
    },

    /// A resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MinosError {
    /// Creates an action error.
    #[must_use]
    pub fn action(message: impl Into<String>) -> Self {
        Self::Action(message.into())
    }

    /// Creates a render error.
    #[must_use]
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Creates a controller load error.
    #[must_use]
    pub fn controller_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ControllerLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a module load error.
    #[must_use]
    pub fn module_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModuleLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wraps a filter failure with the filter's name.
    #[must_use]
    pub fn filter_rejected(filter: impl Into<String>, source: MinosError) -> Self {
        Self::FilterRejected {
            filter: filter.into(),
            source: Box::new(source),
        }
    }

    /// Converts a panic payload captured by `catch_unwind`.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }

    /// Returns `true` for the already-handled render marker.
    #[must_use]
    pub const fn is_render_handled(&self) -> bool {
        matches!(self, Self::RenderHandled)
    }

    /// Returns `true` for render failures.
    #[must_use]
    pub const fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        let err = MinosError::action("boom");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_filter_rejected_keeps_source() {
        let err = MinosError::filter_rejected("auth", MinosError::action("denied"));

        assert_eq!(
            err.to_string(),
            "filter 'auth' rejected the request: denied"
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "denied");
    }

    #[test]
    fn test_from_panic_payloads() {
        let err = MinosError::from_panic(Box::new("static message"));
        assert_eq!(err.to_string(), "panicked: static message");

        let err = MinosError::from_panic(Box::new(String::from("owned message")));
        assert_eq!(err.to_string(), "panicked: owned message");

        let err = MinosError::from_panic(Box::new(42_u32));
        assert!(matches!(err, MinosError::Panicked(_)));
    }

    #[test]
    fn test_from_anyhow() {
        fn fails() -> MinosResult<()> {
            Err(anyhow::anyhow!("database unavailable"))?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, MinosError::Internal(_)));
        assert_eq!(err.to_string(), "database unavailable");
    }

    #[test]
    fn test_markers() {
        assert!(MinosError::RenderHandled.is_render_handled());
        assert!(MinosError::render("home", "missing").is_render());
        assert!(!MinosError::action("x").is_render());
    }

    #[test]
    fn test_timeout_display() {
        let err = MinosError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "request timed out after 1.5s");
    }
}
