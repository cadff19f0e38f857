//! The filter contract and the filter catalog.

use std::collections::HashMap;
use std::sync::Arc;

use minos_core::{BoxFuture, MinosResult, Request, Response};

/// A before-filter run ahead of controller actions.
///
/// A filter may inspect and modify the request and response. Returning an
/// error rejects the request: no later filter runs and the action is skipped.
///
/// # Example
///
/// ```
/// use minos_core::{BoxFuture, MinosError, MinosResult, Request, Response};
/// use minos_filter::Filter;
///
/// struct RequireJson;
///
/// impl Filter for RequireJson {
///     fn process<'a>(
///         &'a self,
///         request: &'a mut Request,
///         _response: &'a mut Response,
///     ) -> BoxFuture<'a, MinosResult<()>> {
///         Box::pin(async move {
///             match request.header("content-type") {
///                 Some(value) if value.starts_with("application/json") => Ok(()),
///                 _ => Err(MinosError::action("expected a JSON body")),
///             }
///         })
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// Runs the filter against one request.
    fn process<'a>(
        &'a self,
        request: &'a mut Request,
        response: &'a mut Response,
    ) -> BoxFuture<'a, MinosResult<()>>;
}

/// A filter built from a closure returning a boxed future.
///
/// ```
/// use minos_filter::FnFilter;
///
/// let stamp = FnFilter::new(|request, _response| {
///     Box::pin(async move {
///         request.extensions_mut().insert(42_u32);
///         Ok(())
///     })
/// });
/// # let _ = stamp;
/// ```
pub struct FnFilter<F> {
    func: F,
}

impl<F> FnFilter<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, MinosResult<()>>
        + Send
        + Sync,
{
    /// Wraps `func`.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Filter for FnFilter<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, MinosResult<()>>
        + Send
        + Sync,
{
    fn process<'a>(
        &'a self,
        request: &'a mut Request,
        response: &'a mut Response,
    ) -> BoxFuture<'a, MinosResult<()>> {
        (self.func)(request, response)
    }
}

/// Filter implementations keyed by filter name.
///
/// Filter sources found on disk are resolved against the catalog by their
/// file stem.
#[derive(Clone, Default)]
pub struct FilterCatalog {
    entries: HashMap<String, Arc<dyn Filter>>,
}

impl FilterCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `filter` under `name`.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, filter: impl Filter + 'static) -> Self {
        self.entries.insert(name.into(), Arc::new(filter));
        self
    }

    /// Registers an already shared filter.
    #[must_use]
    pub fn register_arc(mut self, name: impl Into<String>, filter: Arc<dyn Filter>) -> Self {
        self.entries.insert(name.into(), filter);
        self
    }

    /// Looks up a filter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Filter>> {
        self.entries.get(name).cloned()
    }

    /// Iterates over every registered filter.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Filter>)> {
        self.entries.iter().map(|(name, filter)| (name.as_str(), filter))
    }

    /// Number of registered filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FilterCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("FilterCatalog").field("names", &names).finish()
    }
}
