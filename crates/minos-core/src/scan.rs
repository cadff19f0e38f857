//! Source directory scanning.
//!
//! Controllers, filters and template mixins are discovered by convention from
//! directories under the application base path. Scanning only lists eligible
//! files; turning them into objects is up to the registration tables.

use std::path::{Path, PathBuf};

use minos_router::PathClassifier;
use walkdir::WalkDir;

use crate::error::{MinosError, MinosResult};

/// Lists eligible source files under `root`, relative to it.
///
/// Files are ordered shallowest first, then by path, so reversing the list
/// yields the deepest files first. With `recursive == false` only direct
/// children of `root` are listed.
///
/// # Errors
///
/// Fails when `root` does not exist or cannot be read.
pub fn scan_sources(
    root: &Path,
    classifier: &PathClassifier,
    recursive: bool,
) -> MinosResult<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry
            .map_err(|e| MinosError::module_load(root.display().to_string(), e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_or_else(|_| entry.path().to_path_buf(), Path::to_path_buf);

        if classifier.is_eligible_source(&relative) {
            files.push(relative);
        }
    }

    files.sort_by(|a, b| {
        a.components()
            .count()
            .cmp(&b.components().count())
            .then_with(|| a.cmp(b))
    });

    Ok(files)
}

/// Finds `<dir>/<stem>.<ext>` for any extension the classifier accepts.
#[must_use]
pub fn find_source(dir: &Path, stem: &str, classifier: &PathClassifier) -> Option<PathBuf> {
    classifier
        .extensions()
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_recursive_scan_orders_shallow_first() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "foo/bar.rs");
        touch(dir.path(), "foo.rs");
        touch(dir.path(), "index.rs");
        touch(dir.path(), "notes.txt");

        let files = scan_sources(dir.path(), &PathClassifier::new(), true).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("foo.rs"),
                PathBuf::from("index.rs"),
                PathBuf::from("foo/bar.rs"),
            ]
        );
    }

    #[test]
    fn test_flat_scan() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "auth.rs");
        touch(dir.path(), "nested/skip.rs");

        let files = scan_sources(dir.path(), &PathClassifier::new(), false).unwrap();
        assert_eq!(files, vec![PathBuf::from("auth.rs")]);
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = scan_sources(&missing, &PathClassifier::new(), true).unwrap_err();
        assert!(matches!(err, MinosError::ModuleLoad { .. }));
    }

    #[test]
    fn test_find_source() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "error.js");

        let classifier = PathClassifier::new();
        assert_eq!(
            find_source(dir.path(), "error", &classifier),
            Some(dir.path().join("error.js"))
        );
        assert_eq!(find_source(dir.path(), "missing", &classifier), None);
    }
}
