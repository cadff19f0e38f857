//! Convention-based route derivation for Minos.
//!
//! Controllers are discovered from a directory tree and every controller file
//! yields a set of RESTful routes derived from its path. This crate holds the
//! pure parts of that process:
//!
//! - [`PathClassifier`] decides which files are controller sources
//! - [`table`] turns a file path into the canonical REST route set, expanding
//!   nested resources into every collection/member combination
//! - [`RoutePattern`] and [`Router`] match incoming paths against bound routes
//!   in registration order, the way the host server expects
//!
//! # Example
//!
//! ```rust
//! use minos_router::{table, Action};
//! use http::Method;
//!
//! let routes = table::routes_for_url(&table::fix_url("foo/bar.rs"));
//! assert_eq!(routes.len(), 14);
//!
//! assert_eq!(routes[3].method, Method::GET);
//! assert_eq!(routes[3].url, "/foo/bar/:barId");
//! assert_eq!(routes[3].action, Action::Show);
//!
//! assert_eq!(routes[7].url, "/foo/:fooId/bar");
//! ```
//!
//! # Nested resources
//!
//! A controller at `a/b/c` produces 2^(3-1) = 4 base paths:
//!
//! ```text
//! /a/b/c
//! /a/b/:bId/c
//! /a/:aId/b/c
//! /a/:aId/b/:bId/c
//! ```
//!
//! Each base path receives the seven canonical routes.

#![doc(html_root_url = "https://docs.rs/minos-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod inflect;
mod params;
mod path;
mod pattern;
mod route;
mod router;
pub mod table;

pub use inflect::singularize;
pub use params::Params;
pub use path::{route_key, PathClassifier, ERROR_CONTROLLER, SOURCE_EXTENSIONS};
pub use pattern::{PatternError, RoutePattern};
pub use route::{Action, Route};
pub use router::{RouteMatch, Router};
