//! Template mixins.
//!
//! A mixin contributes one value to every render, computed from the values
//! already assembled for that render. Mixins are discovered from a directory
//! and resolved through a [`MixinCatalog`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use minos_core::scan::scan_sources;
use minos_router::{route_key, PathClassifier};
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::ViewError;

/// A value provider merged into template values under its name.
pub trait TemplateMixin: Send + Sync {
    /// Computes the mixin value for one render.
    fn bind(&self, values: &Map<String, Value>) -> Value;
}

impl<F> TemplateMixin for F
where
    F: Fn(&Map<String, Value>) -> Value + Send + Sync,
{
    fn bind(&self, values: &Map<String, Value>) -> Value {
        self(values)
    }
}

/// Mixin implementations keyed by name.
#[derive(Clone, Default)]
pub struct MixinCatalog {
    entries: HashMap<String, Arc<dyn TemplateMixin>>,
}

impl MixinCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `mixin` under `name`.
    #[must_use]
    pub fn register(
        mut self,
        name: impl Into<String>,
        mixin: impl TemplateMixin + 'static,
    ) -> Self {
        self.entries.insert(name.into(), Arc::new(mixin));
        self
    }

    /// Looks up a mixin.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn TemplateMixin>> {
        self.entries.get(name).cloned()
    }
}

impl std::fmt::Debug for MixinCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("MixinCatalog").field("names", &names).finish()
    }
}

/// The set of mixins bound into every render.
///
/// Cloning shares the underlying set.
#[derive(Clone, Default)]
pub struct TemplateMixins {
    active: Arc<RwLock<HashMap<String, Arc<dyn TemplateMixin>>>>,
}

impl TemplateMixins {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the mixins whose sources sit directly in `dir`.
    ///
    /// A missing directory leaves the set untouched. The set is replaced
    /// wholesale once every source resolved.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be read or a source has no catalog
    /// entry.
    pub fn load(&self, dir: &Path, catalog: &MixinCatalog) -> Result<(), ViewError> {
        let start = Instant::now();

        if !dir.exists() {
            tracing::debug!(dir = %dir.display(), "no template mixin directory");
            return Ok(());
        }

        let sources = scan_sources(dir, &PathClassifier::new(), false).map_err(|e| {
            ViewError::MixinLoad {
                path: dir.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let mut loaded = HashMap::with_capacity(sources.len());
        for source in sources {
            let name = route_key(&source);
            let mixin = catalog.get(&name).ok_or_else(|| ViewError::MixinLoad {
                path: dir.join(&source).display().to_string(),
                message: format!("no template mixin registered as '{name}'"),
            })?;
            loaded.insert(name, mixin);
        }

        *self.active.write() = loaded;
        minos_telemetry::profile("Load template mixins", start);
        Ok(())
    }

    /// Adds or replaces a single mixin.
    pub fn insert(&self, name: impl Into<String>, mixin: Arc<dyn TemplateMixin>) {
        self.active.write().insert(name.into(), mixin);
    }

    /// Binds every mixin into `values`, each under its own name.
    ///
    /// Mixins see the values as they were before any mixin ran.
    pub fn bind_all(&self, values: &mut Map<String, Value>) {
        let active = self.active.read();
        if active.is_empty() {
            return;
        }

        let snapshot = values.clone();
        for (name, mixin) in active.iter() {
            values.insert(name.clone(), mixin.bind(&snapshot));
        }
    }

    /// Sorted mixin names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.active.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for TemplateMixins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateMixins")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn shout(values: &Map<String, Value>) -> Value {
        let title = values.get("title").and_then(Value::as_str).unwrap_or("");
        Value::String(title.to_uppercase())
    }

    #[test]
    fn test_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mixins = TemplateMixins::new();

        mixins
            .load(&dir.path().join("template_mixins"), &MixinCatalog::new())
            .unwrap();
        assert!(mixins.names().is_empty());
    }

    #[test]
    fn test_load_and_bind() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shout.rs"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let catalog = MixinCatalog::new().register("shout", shout);
        let mixins = TemplateMixins::new();
        mixins.load(dir.path(), &catalog).unwrap();

        assert_eq!(mixins.names(), vec!["shout".to_string()]);

        let mut values = json!({ "title": "home" }).as_object().cloned().unwrap();
        mixins.bind_all(&mut values);
        assert_eq!(values["shout"], json!("HOME"));
    }

    #[test]
    fn test_unregistered_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dates.rs"), "").unwrap();

        let mixins = TemplateMixins::new();
        mixins.insert("keep", Arc::new(shout));

        let err = mixins.load(dir.path(), &MixinCatalog::new()).unwrap_err();
        assert!(matches!(err, ViewError::MixinLoad { .. }));
        assert_eq!(mixins.names(), vec!["keep".to_string()]);
    }
}
