//! URL patterns bound to the host server.
//!
//! Two shapes exist: slash-separated paths with `:name` parameters, which
//! every REST route uses, and anchored regular expressions, which the
//! catch-all error route uses.

use std::fmt;

use regex::Regex;
use thiserror::Error;

use crate::params::Params;

/// Error returned when a pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route pattern: {0}")]
pub struct PatternError(String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern.
///
/// # Example
///
/// ```rust
/// use minos_router::RoutePattern;
///
/// let pattern = RoutePattern::path("/users/:userId/posts");
/// let params = pattern.match_path("/users/42/posts").unwrap();
/// assert_eq!(params.get("userId"), Some("42"));
///
/// let catch_all = RoutePattern::regex("^(.*)$").unwrap();
/// assert!(catch_all.match_path("/anything/at/all").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RoutePattern {
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Path { source: String, segments: Vec<Segment> },
    Regex(Regex),
}

impl RoutePattern {
    /// Compiles a `:name` path pattern.
    #[must_use]
    pub fn path(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let segments = source
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            kind: PatternKind::Path { source, segments },
        }
    }

    /// Compiles a regular expression pattern.
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        Regex::new(pattern)
            .map(|regex| Self {
                kind: PatternKind::Regex(regex),
            })
            .map_err(|e| PatternError(e.to_string()))
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match &self.kind {
            PatternKind::Path { source, .. } => source,
            PatternKind::Regex(regex) => regex.as_str(),
        }
    }

    /// Matches a request path, returning captured parameters.
    ///
    /// Leading and trailing slashes are not significant for path patterns.
    /// Regex patterns expose numbered capture groups as parameters `0`, `1`…
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        match &self.kind {
            PatternKind::Path { segments, .. } => match_segments(segments, path),
            PatternKind::Regex(regex) => {
                let captures = regex.captures(path)?;
                let mut params = Params::new();
                for (index, group) in captures.iter().skip(1).enumerate() {
                    if let Some(group) = group {
                        params.push(index.to_string(), group.as_str());
                    }
                }
                Some(params)
            }
        }
    }
}

fn match_segments(pattern: &[Segment], path: &str) -> Option<Params> {
    let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if actual.len() != pattern.len() {
        return None;
    }

    let mut params = Params::new();

    for (segment, value) in pattern.iter().zip(actual) {
        match segment {
            Segment::Literal(expected) if expected == value => {}
            Segment::Literal(_) => return None,
            Segment::Param(name) => params.push(name.as_str(), value),
        }
    }

    Some(params)
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::path(pattern)
    }
}

impl From<String> for RoutePattern {
    fn from(pattern: String) -> Self {
        Self::path(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = RoutePattern::path("/users/new");

        assert!(pattern.match_path("/users/new").is_some());
        assert!(pattern.match_path("/users/edit").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = RoutePattern::path("/foo/:fooId/bar/:barId");
        let params = pattern.match_path("/foo/1/bar/2").unwrap();

        assert_eq!(params.get("fooId"), Some("1"));
        assert_eq!(params.get("barId"), Some("2"));
    }

    #[test]
    fn test_segment_count_must_match() {
        let pattern = RoutePattern::path("/users/:userId");

        assert!(pattern.match_path("/users").is_none());
        assert!(pattern.match_path("/users/1/extra").is_none());
    }

    #[test]
    fn test_root_and_trailing_slash() {
        let root = RoutePattern::path("/");
        assert!(root.match_path("/").is_some());
        assert!(root.match_path("/x").is_none());

        let users = RoutePattern::path("/users");
        assert!(users.match_path("/users/").is_some());
    }

    #[test]
    fn test_regex_catch_all() {
        let pattern = RoutePattern::regex("^(.*)$").unwrap();
        let params = pattern.match_path("/missing/page").unwrap();

        assert_eq!(params.get("0"), Some("/missing/page"));
        assert_eq!(pattern.as_str(), "^(.*)$");
    }

    #[test]
    fn test_invalid_regex() {
        let err = RoutePattern::regex("(unclosed").unwrap_err();
        assert!(err.to_string().contains("invalid route pattern"));
    }
}
