//! Request metadata derived from URLs and route patterns.

use minos_router::ERROR_CONTROLLER;

/// URL the catch-all error route is registered under.
pub const ERROR_URL: &str = "/error";

const EXCLUDED_PARTS: [&str; 2] = ["new", "edit"];

/// The page name of a request URL: no query, no leading or trailing slash.
///
/// ```
/// use minos_dispatch::page_for;
///
/// assert_eq!(page_for("/users/42/?tab=posts"), "users/42");
/// assert_eq!(page_for("/"), "");
/// ```
#[must_use]
pub fn page_for(url: &str) -> String {
    let path = url.split('?').next().unwrap_or_default();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    path.to_string()
}

/// Resource segments of the route a request matched.
///
/// Parameters and the `new`/`edit` segments are dropped. The error route
/// always yields `["error"]`.
///
/// ```
/// use minos_dispatch::controller_parts;
///
/// assert_eq!(
///     controller_parts("/users/posts", "/users/:userId/posts/:postId/edit"),
///     vec!["users", "posts"]
/// );
/// assert_eq!(controller_parts("/error", "^(.*)$"), vec!["error"]);
/// ```
#[must_use]
pub fn controller_parts(url: &str, pattern: &str) -> Vec<String> {
    if url == ERROR_URL {
        return vec![ERROR_CONTROLLER.to_string()];
    }

    pattern
        .split('/')
        .filter(|part| !part.is_empty() && !part.starts_with(':'))
        .filter(|part| !EXCLUDED_PARTS.contains(part))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_strips_query_and_slashes() {
        assert_eq!(page_for("/users"), "users");
        assert_eq!(page_for("/users/"), "users");
        assert_eq!(page_for("users?a=1"), "users");
        assert_eq!(page_for(""), "");
    }

    #[test]
    fn test_parts_skip_params_and_new_edit() {
        assert_eq!(controller_parts("/users", "/users/new"), vec!["users"]);
        assert_eq!(controller_parts("/users", "/users/:userId"), vec!["users"]);
        assert!(controller_parts("/", "/").is_empty());
        assert!(controller_parts("/", "/:id/edit").is_empty());
    }
}
