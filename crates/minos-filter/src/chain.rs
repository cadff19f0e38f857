//! Filter loading and sequential execution.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use minos_core::scan::scan_sources;
use minos_core::{MinosError, MinosResult, Request, Response};
use minos_router::{route_key, PathClassifier};
use parking_lot::RwLock;

use crate::filter::{Filter, FilterCatalog};

/// The loaded filters and the engine that runs them.
///
/// Cloning shares the loaded set. Loading replaces the whole set at once, so
/// a concurrent [`run`](Self::run) sees either the old or the new filters.
#[derive(Clone, Default)]
pub struct FilterChain {
    filters: Arc<RwLock<HashMap<String, Arc<dyn Filter>>>>,
}

impl FilterChain {
    /// Creates a chain with no filters loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every filter source sitting directly in `dir`.
    ///
    /// Each source is keyed by its file stem and resolved through `catalog`.
    ///
    /// # Errors
    ///
    /// Fails with [`MinosError::ModuleLoad`] when the directory cannot be
    /// read or a source has no catalog entry. The loaded set is left as it
    /// was.
    pub fn load(&self, dir: &Path, catalog: &FilterCatalog) -> MinosResult<()> {
        let start = Instant::now();
        let sources = scan_sources(dir, &PathClassifier::new(), false)?;

        let mut loaded = HashMap::with_capacity(sources.len());
        for source in sources {
            let name = route_key(&source);
            let filter = catalog.get(&name).ok_or_else(|| {
                MinosError::module_load(
                    dir.join(&source).display().to_string(),
                    format!("no filter registered as '{name}'"),
                )
            })?;
            loaded.insert(name, filter);
        }

        *self.filters.write() = loaded;
        minos_telemetry::profile("Load filters", start);
        Ok(())
    }

    /// Replaces the loaded set with every catalog entry.
    pub fn install(&self, catalog: &FilterCatalog) {
        let loaded = catalog
            .iter()
            .map(|(name, filter)| (name.to_string(), Arc::clone(filter)))
            .collect();
        *self.filters.write() = loaded;
    }

    /// Drops every loaded filter.
    pub fn reset(&self) {
        self.filters.write().clear();
    }

    /// Returns `true` when `name` is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.filters.read().contains_key(name)
    }

    /// Sorted names of the loaded filters.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.filters.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Runs the named filters in order.
    ///
    /// Names that are not loaded are skipped. Each filter starts only after
    /// the previous one finished; the first failure stops the chain and is
    /// returned as [`MinosError::FilterRejected`]. A panicking filter counts
    /// as a failure.
    ///
    /// # Errors
    ///
    /// Returns the first filter failure.
    pub async fn run<S>(
        &self,
        names: &[S],
        request: &mut Request,
        response: &mut Response,
    ) -> MinosResult<()>
    where
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Ok(());
        }

        let selected: Vec<(String, Arc<dyn Filter>)> = {
            let filters = self.filters.read();
            names
                .iter()
                .filter_map(|name| {
                    let name = name.as_ref();
                    filters
                        .get(name)
                        .map(|filter| (name.to_string(), Arc::clone(filter)))
                })
                .collect()
        };

        for (name, filter) in selected {
            tracing::debug!(filter = %name, "Running the {name} filter");

            let outcome = AssertUnwindSafe(async {
                filter.process(&mut *request, &mut *response).await
            })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(MinosError::from_panic(payload)));

            if let Err(error) = outcome {
                tracing::debug!(filter = %name, "Rejected {name} filter");
                return Err(MinosError::filter_rejected(name, error));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .finish()
    }
}
