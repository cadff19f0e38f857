//! Server error types.

use std::path::PathBuf;

use minos_config::ConfigError;
use minos_core::MinosError;
use minos_view::ViewError;
use thiserror::Error;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be parsed or bound.
    #[error("Failed to bind: {0}")]
    Bind(String),

    /// No port was given and configuration has no `port`.
    #[error("No port configured")]
    MissingPort,

    /// `listen` was called before `initialize`.
    #[error("Application is not initialized")]
    NotInitialized,

    /// Loading `config/app.*` failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Loading template mixins failed.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Loading filters or controllers failed.
    #[error("Could not load {}: {source}", path.display())]
    Load {
        /// Directory being loaded.
        path: PathBuf,
        /// Cause.
        #[source]
        source: MinosError,
    },

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: MinosError) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }
}
