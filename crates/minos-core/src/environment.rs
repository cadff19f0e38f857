//! Process environment details.
//!
//! An [`Environment`] is built once at startup and shared by reference. Nothing
//! reads process-wide state after construction, so tests can build as many
//! environments as they need.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Environment variable selecting the environment name.
pub const ENV_VAR: &str = "MINOS_ENV";

/// Environment variable marking a managed worker process.
pub const WORKER_VAR: &str = "MINOS_WORKER";

/// Environment used when [`ENV_VAR`] is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Context name used when none is configured.
pub const DEFAULT_CONTEXT_NAME: &str = "minos";

/// Environment-specific details of the running application.
///
/// # Example
///
/// ```
/// use minos_core::Environment;
///
/// let env = Environment::new("production").with_worker(true);
/// assert!(env.is_production());
/// assert!(env.is_worker());
/// assert!(!env.is_development());
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    base_path: PathBuf,
    instance: u32,
    worker: bool,
    context_id: String,
    context_name: String,
}

impl Environment {
    /// Creates an environment with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_path: PathBuf::from("."),
            instance: 1,
            worker: false,
            context_id: new_context_id(),
            context_name: DEFAULT_CONTEXT_NAME.to_string(),
        }
    }

    /// Reads [`ENV_VAR`] and [`WORKER_VAR`] from the process environment.
    ///
    /// A worker is any process where [`WORKER_VAR`] is set to something other
    /// than `0`, `false` or the empty string.
    #[must_use]
    pub fn from_env() -> Self {
        let name = std::env::var(ENV_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let worker = std::env::var(WORKER_VAR)
            .map(|v| !matches!(v.trim(), "" | "0" | "false"))
            .unwrap_or(false);

        Self::new(name).with_worker(worker)
    }

    /// Sets the application base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the instance number.
    #[must_use]
    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    /// Marks the process as a managed worker.
    #[must_use]
    pub fn with_worker(mut self, worker: bool) -> Self {
        self.worker = worker;
        self
    }

    /// Sets the context name.
    #[must_use]
    pub fn with_context_name(mut self, context_name: impl Into<String>) -> Self {
        self.context_name = context_name.into();
        self
    }

    /// Environment name, e.g. `development`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Application base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Instance number.
    #[must_use]
    pub const fn instance(&self) -> u32 {
        self.instance
    }

    /// Unique id of this process: a UUID followed by the pid, without dashes.
    #[must_use]
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Context name.
    #[must_use]
    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    /// Whether this process is a managed worker.
    #[must_use]
    pub const fn is_worker(&self) -> bool {
        self.worker
    }

    /// Whether the environment is `development`.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.name == "development"
    }

    /// Whether the environment is `production`.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.name == "production"
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_ENVIRONMENT)
    }
}

fn new_context_id() -> String {
    format!("{}.{}", Uuid::new_v4(), std::process::id()).replace('-', "")
}
