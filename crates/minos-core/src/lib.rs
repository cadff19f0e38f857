//! # Minos Core
//!
//! Core types shared by every Minos crate:
//!
//! - [`Request`] and [`Response`] - the buffered request/response model that
//!   filters and controller actions work on
//! - [`Flow`] - whether an action handled a request or passed it on
//! - [`RequestContext`] - per-request dispatch metadata (page, controller,
//!   request token, browser id)
//! - [`MinosError`] - the error type every request path funnels into
//! - [`Environment`] - environment name, worker flag and process identity
//! - [`binding`] - the contract for binding routes to the host server
//! - [`identifier`] and [`scan`] - id generation and source discovery helpers

#![doc(html_root_url = "https://docs.rs/minos-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::future::Future;
use std::pin::Pin;

pub mod binding;
mod context;
mod environment;
mod error;
pub mod identifier;
mod request;
mod response;
pub mod scan;

pub use binding::{route_handler, route_request, RouteBinder, RouteHandler, Routed};
pub use context::{
    generate_browser_id, ControllerRef, RequestContext, BROWSER_CONTEXT_HEADER,
    BROWSER_ID_PREFIX,
};
pub use environment::Environment;
pub use error::{MinosError, MinosResult};
pub use request::Request;
pub use response::{Flow, Response};

/// A boxed future, used wherever traits return async results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
