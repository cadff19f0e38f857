//! Controller source classification.

use std::path::Path;

/// File extensions recognized as controller or filter sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["rs", "js", "coffee"];

/// Route key of the reserved error controller.
pub const ERROR_CONTROLLER: &str = "error";

/// Decides which files under a controllers directory become routes.
///
/// # Example
///
/// ```rust
/// use minos_router::PathClassifier;
///
/// let classifier = PathClassifier::new();
///
/// assert!(classifier.is_eligible_source("users/posts.rs"));
/// assert!(!classifier.is_eligible_source("users/README.md"));
///
/// // the error controller is bound separately
/// assert!(!classifier.is_routable("error.rs"));
/// ```
#[derive(Debug, Clone)]
pub struct PathClassifier {
    extensions: Vec<String>,
}

impl PathClassifier {
    /// Creates a classifier accepting [`SOURCE_EXTENSIONS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_extensions(SOURCE_EXTENSIONS.iter().copied())
    }

    /// Creates a classifier accepting only the given extensions.
    #[must_use]
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the accepted extensions.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns `true` when `path` carries a recognized source extension.
    pub fn is_eligible_source(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    /// Returns `true` when `path` names the reserved error controller.
    ///
    /// Matches `error.<ext>` at the controllers root as well as absolute
    /// paths ending in `controllers/error.<ext>`.
    pub fn is_error_controller(&self, path: impl AsRef<Path>) -> bool {
        let stem = route_key(path.as_ref());
        stem == ERROR_CONTROLLER || stem.ends_with("controllers/error")
    }

    /// Eligible source that is not the error controller.
    pub fn is_routable(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.is_eligible_source(path) && !self.is_error_controller(path)
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a relative source path into its registration key.
///
/// The key is the path without its extension, joined with `/` on every
/// platform: `foo/bar.rs` becomes `foo/bar`.
#[must_use]
pub fn route_key(path: &Path) -> String {
    let without_ext = path.with_extension("");
    without_ext
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .filter(|part| *part != "/" && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_extensions() {
        let classifier = PathClassifier::new();

        assert!(classifier.is_eligible_source("index.rs"));
        assert!(classifier.is_eligible_source("foo/bar.js"));
        assert!(classifier.is_eligible_source("foo/bar.coffee"));
        assert!(!classifier.is_eligible_source("foo/bar.txt"));
        assert!(!classifier.is_eligible_source("foo/bar"));
    }

    #[test]
    fn test_custom_extensions() {
        let classifier = PathClassifier::with_extensions(["rs"]);

        assert!(classifier.is_eligible_source("users.rs"));
        assert!(!classifier.is_eligible_source("users.js"));
    }

    #[test]
    fn test_error_controller_excluded() {
        let classifier = PathClassifier::new();

        assert!(classifier.is_error_controller("error.rs"));
        assert!(classifier.is_error_controller("/srv/app/lib/controllers/error.js"));
        assert!(!classifier.is_error_controller("errors.rs"));
        assert!(!classifier.is_error_controller("reports/error_log.rs"));

        assert!(!classifier.is_routable("error.rs"));
        assert!(classifier.is_routable("reports.rs"));
    }

    #[test]
    fn test_route_key() {
        assert_eq!(route_key(Path::new("foo/bar.rs")), "foo/bar");
        assert_eq!(route_key(Path::new("index.js")), "index");
        assert_eq!(route_key(Path::new("./users.rs")), "users");
    }
}
