//! First-match route table.
//!
//! Routes are tried in registration order. A handler may decline a request,
//! in which case the caller continues with the next match, so [`Router::matches`]
//! yields every candidate lazily instead of a single winner.

use http::Method;

use crate::params::Params;
use crate::pattern::RoutePattern;

struct Entry<H> {
    method: Method,
    pattern: RoutePattern,
    handler: H,
}

/// Ordered collection of `(method, pattern, handler)` bindings.
///
/// # Example
///
/// ```rust
/// use minos_router::{RoutePattern, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add(Method::GET, RoutePattern::path("/users/new"), "new");
/// router.add(Method::GET, RoutePattern::path("/users/:userId"), "show");
///
/// let first = router.matches(&Method::GET, "/users/new").next().unwrap();
/// assert_eq!(*first.handler, "new");
///
/// let all: Vec<_> = router.matches(&Method::GET, "/users/new").collect();
/// assert_eq!(all.len(), 2);
/// assert_eq!(all[1].params.get("userId"), Some("new"));
/// ```
pub struct Router<H> {
    entries: Vec<Entry<H>>,
}

/// One matching binding.
#[derive(Debug)]
pub struct RouteMatch<'r, H> {
    /// Bound handler.
    pub handler: &'r H,
    /// Parameters captured from the path.
    pub params: Params,
    /// Pattern that matched.
    pub pattern: &'r RoutePattern,
}

impl<H> Router<H> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a binding. Later bindings never shadow earlier ones.
    pub fn add(&mut self, method: Method, pattern: impl Into<RoutePattern>, handler: H) {
        self.entries.push(Entry {
            method,
            pattern: pattern.into(),
            handler,
        });
    }

    /// Every binding matching `method` and `path`, in registration order.
    pub fn matches<'r>(
        &'r self,
        method: &'r Method,
        path: &'r str,
    ) -> impl Iterator<Item = RouteMatch<'r, H>> + 'r {
        self.entries
            .iter()
            .filter(move |entry| entry.method == *method)
            .filter_map(move |entry| {
                entry.pattern.match_path(path).map(|params| RouteMatch {
                    handler: &entry.handler,
                    params,
                    pattern: &entry.pattern,
                })
            })
    }

    /// Returns `true` if any binding accepts `path` under another method.
    pub fn allows_path(&self, path: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.pattern.match_path(path).is_some())
    }

    /// Registered bindings as `(method, pattern)` pairs.
    pub fn bindings(&self) -> impl Iterator<Item = (&Method, &RoutePattern)> {
        self.entries.iter().map(|e| (&e.method, &e.pattern))
    }

    /// Number of bindings.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> std::fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|e| format!("{} {}", e.method, e.pattern)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router<&'static str> {
        let mut router = Router::new();
        router.add(Method::GET, "/users", "index");
        router.add(Method::GET, "/users/new", "new");
        router.add(Method::POST, "/users", "create");
        router.add(Method::GET, "/users/:userId", "show");
        router
    }

    #[test]
    fn test_empty_router() {
        let router: Router<()> = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.matches(&Method::GET, "/").count(), 0);
    }

    #[test]
    fn test_method_filtering() {
        let router = router();

        let get: Vec<_> = router.matches(&Method::GET, "/users").collect();
        assert_eq!(get.len(), 1);
        assert_eq!(*get[0].handler, "index");

        let post: Vec<_> = router.matches(&Method::POST, "/users").collect();
        assert_eq!(*post[0].handler, "create");

        assert_eq!(router.matches(&Method::DELETE, "/users").count(), 0);
    }

    #[test]
    fn test_registration_order_wins() {
        let router = router();
        let handlers: Vec<_> = router
            .matches(&Method::GET, "/users/new")
            .map(|m| *m.handler)
            .collect();

        assert_eq!(handlers, vec!["new", "show"]);
    }

    #[test]
    fn test_params_captured() {
        let router = router();
        let found = router.matches(&Method::GET, "/users/42").next().unwrap();

        assert_eq!(*found.handler, "show");
        assert_eq!(found.params.get("userId"), Some("42"));
        assert_eq!(found.pattern.as_str(), "/users/:userId");
    }

    #[test]
    fn test_regex_binding_last() {
        let mut router = router();
        router.add(Method::GET, RoutePattern::regex("^(.*)$").unwrap(), "error");

        let handlers: Vec<_> = router
            .matches(&Method::GET, "/nowhere")
            .map(|m| *m.handler)
            .collect();
        assert_eq!(handlers, vec!["error"]);
        assert_eq!(router.route_count(), 5);
    }

    #[test]
    fn test_allows_path() {
        let router = router();
        assert!(router.allows_path("/users/1"));
        assert!(!router.allows_path("/posts"));
    }
}
