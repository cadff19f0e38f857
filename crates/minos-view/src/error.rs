//! View error types.

use thiserror::Error;

/// Errors raised while rendering templates or loading mixins.
#[derive(Debug, Error)]
pub enum ViewError {
    /// No template exists under the requested name.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The template name tried to escape the template root.
    #[error("invalid template name: {0}")]
    InvalidName(String),

    /// The engine failed while compiling or rendering.
    #[error("failed to render template '{template}': {message}")]
    Render {
        /// Template being rendered.
        template: String,
        /// Engine error message.
        message: String,
    },

    /// A template mixin source had no registered implementation.
    #[error("failed to load template mixin '{path}': {message}")]
    MixinLoad {
        /// Source path of the mixin.
        path: String,
        /// Cause.
        message: String,
    },
}

impl ViewError {
    /// Create a new render error.
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }
}

impl From<ViewError> for minos_core::MinosError {
    fn from(error: ViewError) -> Self {
        match error {
            ViewError::TemplateNotFound(name) => Self::render(name, "template not found"),
            ViewError::InvalidName(name) => Self::render(name, "invalid template name"),
            ViewError::Render { template, message } => Self::render(template, message),
            ViewError::MixinLoad { path, message } => Self::module_load(path, message),
        }
    }
}
