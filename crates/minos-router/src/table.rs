//! REST route derivation from controller paths.
//!
//! Every function here is pure. The route set for a controller depends only on
//! its path relative to the controllers root.

use http::Method;

use crate::inflect::singularize;
use crate::path::SOURCE_EXTENSIONS;
use crate::route::{Action, Route};

/// Normalizes a controller path into a URL.
///
/// Strips a trailing `index.<ext>` file name or a source extension, collapses
/// repeated slashes, drops a trailing slash and guarantees a leading one.
///
/// # Example
///
/// ```rust
/// use minos_router::table::fix_url;
///
/// assert_eq!(fix_url("/foo/bar/index.js"), "/foo/bar");
/// assert_eq!(fix_url("index.rs"), "/");
/// assert_eq!(fix_url("users/posts.rs"), "/users/posts");
/// assert_eq!(fix_url(""), "/");
/// ```
#[must_use]
pub fn fix_url(raw: &str) -> String {
    let mut url = strip_source_file(raw).to_string();

    while url.contains("//") {
        url = url.replace("//", "/");
    }

    if url.len() > 1 && url.ends_with('/') {
        url.pop();
    }

    if !url.starts_with('/') {
        url.insert(0, '/');
    }

    url
}

fn strip_source_file(raw: &str) -> &str {
    for ext in SOURCE_EXTENSIONS {
        let index_file = format!("index.{ext}");
        if let Some(rest) = raw.strip_suffix(index_file.as_str()) {
            if rest.is_empty() || rest.ends_with('/') {
                return rest;
            }
        }
    }

    for ext in SOURCE_EXTENSIONS {
        if let Some(rest) = raw.strip_suffix(ext) {
            if let Some(stem) = rest.strip_suffix('.') {
                return stem;
            }
        }
    }

    raw
}

/// Singular name of the last resource in `url`.
#[must_use]
pub fn resource_name(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or_default();
    singularize(last)
}

/// Name of the identifier parameter for the last resource in `url`.
///
/// # Example
///
/// ```rust
/// use minos_router::table::resource_id_name;
///
/// assert_eq!(resource_id_name("/users"), "userId");
/// assert_eq!(resource_id_name("/users/:userId/posts"), "postId");
/// assert_eq!(resource_id_name("/"), "id");
/// ```
#[must_use]
pub fn resource_id_name(url: &str) -> String {
    if url == "/" {
        return "id".to_string();
    }
    format!("{}Id", resource_name(url))
}

/// Expands nested resource segments into every collection/member combination.
///
/// Every segment except the last may appear either bare (`foo`) or followed
/// by its identifier (`foo/:fooId`), so `N` segments yield `2^(N-1)` paths.
/// The returned paths carry no leading slash. An empty input yields a single
/// empty path, which becomes the root.
///
/// # Example
///
/// ```rust
/// use minos_router::table::parent_paths_for_url;
///
/// let paths = parent_paths_for_url(&["foo", "bar"]);
/// assert_eq!(paths, vec!["foo/bar", "foo/:fooId/bar"]);
/// ```
#[must_use]
pub fn parent_paths_for_url(segments: &[&str]) -> Vec<String> {
    match segments {
        [] => vec![String::new()],
        [resource] => vec![(*resource).to_string()],
        [resource, rest @ ..] => {
            let parents = [
                (*resource).to_string(),
                format!("{resource}/:{}", resource_id_name(resource)),
            ];
            let children = parent_paths_for_url(rest);

            parents
                .iter()
                .flat_map(|parent| {
                    children
                        .iter()
                        .map(move |child| format!("{parent}/{child}"))
                })
                .collect()
        }
    }
}

/// The seven canonical routes for one base path.
///
/// Order: index, new, create, show, edit, update, destroy.
#[must_use]
pub fn route_table(base: &str) -> Vec<Route> {
    let id = resource_id_name(base);
    let member = fix_url(&format!("{base}/:{id}"));

    vec![
        Route::new(Method::GET, base, Action::Index),
        Route::new(Method::GET, fix_url(&format!("{base}/new")), Action::New),
        Route::new(Method::POST, base, Action::Create),
        Route::new(Method::GET, member.clone(), Action::Show),
        Route::new(Method::GET, fix_url(&format!("{member}/edit")), Action::Edit),
        Route::new(Method::PUT, member.clone(), Action::Update),
        Route::new(Method::DELETE, member, Action::Destroy),
    ]
}

/// All routes for a normalized controller URL.
///
/// # Example
///
/// ```rust
/// use minos_router::table::routes_for_url;
///
/// let routes = routes_for_url("/");
/// assert_eq!(routes.len(), 7);
/// assert_eq!(routes[3].url, "/:id");
/// ```
#[must_use]
pub fn routes_for_url(url: &str) -> Vec<Route> {
    let segments: Vec<&str> = url.split('/').filter(|s| !s.is_empty()).collect();

    parent_paths_for_url(&segments)
        .into_iter()
        .flat_map(|path| route_table(&format!("/{path}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triples(routes: &[Route]) -> Vec<(Method, &str, Action)> {
        routes
            .iter()
            .map(|r| (r.method.clone(), r.url.as_str(), r.action))
            .collect()
    }

    #[test]
    fn test_fix_url_strips_index_and_extensions() {
        assert_eq!(fix_url("/foo/bar/index.js"), "/foo/bar");
        assert_eq!(fix_url("foo/bar/index.coffee"), "/foo/bar");
        assert_eq!(fix_url("foo/bar.rs"), "/foo/bar");
        assert_eq!(fix_url("index.js"), "/");
        assert_eq!(fix_url(""), "/");
    }

    #[test]
    fn test_fix_url_keeps_resources_named_like_index() {
        assert_eq!(fix_url("reindex.rs"), "/reindex");
        assert_eq!(fix_url("indexes/index.rs"), "/indexes");
    }

    #[test]
    fn test_fix_url_slashes() {
        assert_eq!(fix_url("/foo/"), "/foo");
        assert_eq!(fix_url("foo//bar"), "/foo/bar");
        assert_eq!(fix_url("///foo"), "/foo");
        assert_eq!(fix_url("/"), "/");
    }

    #[test]
    fn test_fix_url_is_idempotent() {
        for input in ["/foo/bar/index.js", "index.js", "", "foo//bar/", "/a/b.rs"] {
            let once = fix_url(input);
            assert_eq!(fix_url(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_resource_id_name() {
        assert_eq!(resource_id_name("/"), "id");
        assert_eq!(resource_id_name("/foo"), "fooId");
        assert_eq!(resource_id_name("/foo/bars"), "barId");
        assert_eq!(resource_id_name("categories"), "categoryId");
    }

    #[test]
    fn test_parent_paths_single_segment() {
        assert_eq!(parent_paths_for_url(&["foo"]), vec!["foo"]);
    }

    #[test]
    fn test_parent_paths_three_segments() {
        let paths = parent_paths_for_url(&["a", "b", "c"]);
        assert_eq!(
            paths,
            vec!["a/b/c", "a/b/:bId/c", "a/:aId/b/c", "a/:aId/b/:bId/c"]
        );
    }

    #[test]
    fn test_parent_paths_empty() {
        assert_eq!(parent_paths_for_url(&[]), vec![String::new()]);
    }

    #[test]
    fn test_root_route_set() {
        let routes = routes_for_url("/");
        assert_eq!(
            triples(&routes),
            vec![
                (Method::GET, "/", Action::Index),
                (Method::GET, "/new", Action::New),
                (Method::POST, "/", Action::Create),
                (Method::GET, "/:id", Action::Show),
                (Method::GET, "/:id/edit", Action::Edit),
                (Method::PUT, "/:id", Action::Update),
                (Method::DELETE, "/:id", Action::Destroy),
            ]
        );
    }

    #[test]
    fn test_empty_url_matches_root() {
        assert_eq!(routes_for_url(""), routes_for_url("/"));
    }

    #[test]
    fn test_nested_route_set() {
        let routes = routes_for_url("/foo/bar");
        assert_eq!(
            triples(&routes),
            vec![
                (Method::GET, "/foo/bar", Action::Index),
                (Method::GET, "/foo/bar/new", Action::New),
                (Method::POST, "/foo/bar", Action::Create),
                (Method::GET, "/foo/bar/:barId", Action::Show),
                (Method::GET, "/foo/bar/:barId/edit", Action::Edit),
                (Method::PUT, "/foo/bar/:barId", Action::Update),
                (Method::DELETE, "/foo/bar/:barId", Action::Destroy),
                (Method::GET, "/foo/:fooId/bar", Action::Index),
                (Method::GET, "/foo/:fooId/bar/new", Action::New),
                (Method::POST, "/foo/:fooId/bar", Action::Create),
                (Method::GET, "/foo/:fooId/bar/:barId", Action::Show),
                (Method::GET, "/foo/:fooId/bar/:barId/edit", Action::Edit),
                (Method::PUT, "/foo/:fooId/bar/:barId", Action::Update),
                (Method::DELETE, "/foo/:fooId/bar/:barId", Action::Destroy),
            ]
        );
    }

    #[test]
    fn test_plural_resources_use_singular_ids() {
        let routes = routes_for_url("/users/posts");
        let urls: Vec<_> = routes.iter().map(|r| r.url.as_str()).collect();

        assert!(urls.contains(&"/users/:userId/posts/:postId/edit"));
        assert!(urls.contains(&"/users/posts/:postId"));
    }
}
