//! Controller registration table.
//!
//! Controllers are compiled into the application, so the catalog maps each
//! route key (`users`, `users/posts`, `index`, `error`) to a factory. Source
//! files found on disk decide which keys are routed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use minos_controller::Controller;
use minos_core::{MinosError, MinosResult};

/// Creates a fresh controller instance.
pub type ControllerFactory = Arc<dyn Fn() -> MinosResult<Arc<dyn Controller>> + Send + Sync>;

/// Route key to controller factory.
///
/// # Example
///
/// ```
/// use minos_controller::Controller;
/// use minos_dispatch::ControllerCatalog;
///
/// #[derive(Default)]
/// struct Users;
/// impl Controller for Users {}
///
/// let catalog = ControllerCatalog::new().register::<Users>("users");
/// assert!(catalog.create("users").is_ok());
/// assert!(catalog.create("posts").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ControllerCatalog {
    factories: HashMap<String, ControllerFactory>,
}

impl ControllerCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `C`, constructed with [`Default`].
    #[must_use]
    pub fn register<C>(self, key: impl Into<String>) -> Self
    where
        C: Controller + Default,
    {
        self.register_factory(key, || Ok(C::default()))
    }

    /// Registers a fallible constructor.
    #[must_use]
    pub fn register_factory<C, F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        C: Controller,
        F: Fn() -> MinosResult<C> + Send + Sync + 'static,
    {
        let factory: ControllerFactory =
            Arc::new(move || factory().map(|c| Arc::new(c) as Arc<dyn Controller>));
        self.factories.insert(key.into(), factory);
        self
    }

    /// Factory registered under `key`.
    #[must_use]
    pub fn factory(&self, key: &str) -> Option<ControllerFactory> {
        self.factories.get(key).cloned()
    }

    /// Creates the controller registered under `key`.
    ///
    /// # Errors
    ///
    /// [`MinosError::ControllerLoad`] when nothing is registered or the
    /// factory fails.
    pub fn create(&self, key: &str) -> MinosResult<Arc<dyn Controller>> {
        let factory = self.factory(key).ok_or_else(|| {
            MinosError::controller_load(key, format!("no controller registered as '{key}'"))
        })?;
        factory()
    }

    /// Returns `true` when `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for ControllerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCatalog")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Users;
    impl Controller for Users {}

    #[test]
    fn test_factory_creates_fresh_instances() {
        let catalog = ControllerCatalog::new().register::<Users>("users");

        let a = catalog.create("users").unwrap();
        let b = catalog.create("users").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_failing_factory() {
        let catalog = ControllerCatalog::new().register_factory("broken", || {
            Err::<Users, _>(MinosError::controller_load("broken", "database offline"))
        });

        let err = catalog.create("broken").err().unwrap();
        assert!(matches!(err, MinosError::ControllerLoad { .. }));
    }

    #[test]
    fn test_keys_sorted() {
        let catalog = ControllerCatalog::new()
            .register::<Users>("users/posts")
            .register::<Users>("index")
            .register::<Users>("users");

        assert_eq!(catalog.keys(), vec!["index", "users", "users/posts"]);
        assert!(catalog.contains("index"));
    }
}
