//! Before-filter declarations and their per-route resolution.

use std::collections::HashMap;

use minos_router::Action;

/// Which actions a declared filter applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterScope {
    /// Every action.
    All,
    /// Only the listed actions.
    Actions(Vec<Action>),
}

impl FilterScope {
    /// Returns `true` when the scope covers `action`.
    #[must_use]
    pub fn applies_to(&self, action: Action) -> bool {
        match self {
            Self::All => true,
            Self::Actions(actions) => actions.contains(&action),
        }
    }
}

/// A controller's `before` filter declarations, in declaration order.
///
/// # Example
///
/// ```
/// use minos_controller::BeforeFilters;
/// use minos_router::Action;
///
/// let before = BeforeFilters::new()
///     .all("session")
///     .only("require_admin", [Action::Create, Action::Destroy]);
///
/// assert_eq!(before.for_action(Action::Index), vec!["session"]);
/// assert_eq!(before.for_action(Action::Destroy), vec!["session", "require_admin"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeforeFilters {
    declared: Vec<(String, FilterScope)>,
}

impl BeforeFilters {
    /// No filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `filter` with an explicit scope.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>, scope: FilterScope) -> Self {
        self.declared.push((filter.into(), scope));
        self
    }

    /// Declares `filter` for every action.
    #[must_use]
    pub fn all(self, filter: impl Into<String>) -> Self {
        self.filter(filter, FilterScope::All)
    }

    /// Declares `filter` for the listed actions only.
    #[must_use]
    pub fn only(
        self,
        filter: impl Into<String>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        self.filter(filter, FilterScope::Actions(actions.into_iter().collect()))
    }

    /// Filters applying to `action`, in declaration order.
    #[must_use]
    pub fn for_action(&self, action: Action) -> Vec<String> {
        self.declared
            .iter()
            .filter(|(_, scope)| scope.applies_to(action))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Returns `true` when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Resolved filter lists per `(url, action)` pair.
#[derive(Debug, Clone, Default)]
pub struct RouteFilters {
    by_route: HashMap<(String, Action), Vec<String>>,
}

impl RouteFilters {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and caches the filters for `url` and `action`.
    pub fn add_filters_for_handler(&mut self, before: &BeforeFilters, url: &str, action: Action) {
        self.by_route
            .insert((url.to_string(), action), before.for_action(action));
    }

    /// Cached filters for `url` and `action`; empty when never resolved.
    #[must_use]
    pub fn get_filters(&self, url: &str, action: Action) -> &[String] {
        self.by_route
            .get(&(url.to_string(), action))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of cached routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_route.len()
    }

    /// Returns `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_route.is_empty()
    }
}
