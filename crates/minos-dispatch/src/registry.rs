//! Controller discovery and loading.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use minos_controller::{Controller, RouteFilters};
use minos_core::scan::{find_source, scan_sources};
use minos_core::{Environment, MinosResult};
use minos_router::{route_key, Action, PathClassifier, ERROR_CONTROLLER};
use parking_lot::RwLock;

use crate::catalog::{ControllerCatalog, ControllerFactory};
use crate::process::ProcessControl;

/// A loaded controller and the filters resolved for its routes.
pub struct ControllerDescriptor {
    key: String,
    source_path: PathBuf,
    instance: Arc<dyn Controller>,
    factory: ControllerFactory,
    filters: RwLock<RouteFilters>,
}

impl ControllerDescriptor {
    /// Route key, e.g. `users/posts`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Source file the controller was discovered from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The long-lived instance.
    pub fn instance(&self) -> &Arc<dyn Controller> {
        &self.instance
    }

    /// Builds a fresh instance from the registered factory.
    pub fn reload(&self) -> MinosResult<Arc<dyn Controller>> {
        (self.factory)()
    }

    /// Resolves and caches the filters of the long-lived instance for `url`
    /// and `action`.
    pub fn add_filters_for_handler(&self, url: &str, action: Action) {
        let before = self.instance.before_filters();
        self.filters
            .write()
            .add_filters_for_handler(&before, url, action);
    }

    /// Cached filters for `url` and `action`.
    pub fn get_filters(&self, url: &str, action: Action) -> Vec<String> {
        self.filters.read().get_filters(url, action).to_vec()
    }
}

impl fmt::Debug for ControllerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerDescriptor")
            .field("key", &self.key)
            .field("source_path", &self.source_path)
            .finish_non_exhaustive()
    }
}

/// Finds controller sources and resolves them through the catalog.
pub struct ControllerRegistry {
    root: PathBuf,
    catalog: ControllerCatalog,
    classifier: PathClassifier,
    environment: Environment,
    process: Arc<dyn ProcessControl>,
}

impl ControllerRegistry {
    /// Creates a registry for the controllers below `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        catalog: ControllerCatalog,
        environment: Environment,
        process: Arc<dyn ProcessControl>,
    ) -> Self {
        Self {
            root: root.into(),
            catalog,
            classifier: PathClassifier::new(),
            environment,
            process,
        }
    }

    /// Uses a different source classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: PathClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Controllers root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Routable controller sources, relative to the root.
    ///
    /// Shallow paths come first; register in reverse so nested resources
    /// bind before their parents.
    ///
    /// # Errors
    ///
    /// Fails when the root cannot be read.
    pub fn discover(&self) -> MinosResult<Vec<PathBuf>> {
        let files = scan_sources(&self.root, &self.classifier, true)?;
        Ok(files
            .into_iter()
            .filter(|file| self.classifier.is_routable(file))
            .collect())
    }

    /// Loads the controller for a discovered source.
    ///
    /// A failure is logged, then a worker asks for a graceful shutdown and a
    /// standalone process terminates. `None` is returned either way so the
    /// caller skips the controller.
    pub fn load(&self, relative: &Path) -> Option<ControllerDescriptor> {
        let start = Instant::now();
        let key = route_key(relative);
        let source_path = self.root.join(relative);

        let loaded = self
            .catalog
            .factory(&key)
            .ok_or_else(|| {
                minos_core::MinosError::controller_load(
                    source_path.display().to_string(),
                    format!("no controller registered as '{key}'"),
                )
            })
            .and_then(|factory| factory().map(|instance| (factory, instance)));

        match loaded {
            Ok((factory, instance)) => {
                let label = format!("Load controller {}", relative.display());
                minos_telemetry::profile(&label, start);
                Some(ControllerDescriptor {
                    key,
                    source_path,
                    instance,
                    factory,
                    filters: RwLock::new(RouteFilters::new()),
                })
            }
            Err(error) => {
                tracing::error!(
                    path = %source_path.display(),
                    "Error while loading controller '{}': {error:?}",
                    source_path.display()
                );

                if self.environment.is_worker() {
                    self.process.request_shutdown();
                } else {
                    self.process.terminate(1);
                }
                None
            }
        }
    }

    /// Loads the reserved `error` controller, if its source exists.
    pub fn load_error_controller(&self) -> Option<ControllerDescriptor> {
        let source = find_source(&self.root, ERROR_CONTROLLER, &self.classifier)?;
        let relative = source
            .strip_prefix(&self.root)
            .map_or_else(|_| source.clone(), Path::to_path_buf);
        self.load(&relative)
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("root", &self.root)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
