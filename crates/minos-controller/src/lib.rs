//! # Minos Controller
//!
//! The controller side of a Minos application:
//!
//! - [`Controller`] - the seven REST actions, before-filter declarations and
//!   the error hook
//! - [`ActionContext`] - request, response and services for one action call,
//!   with the render and error helpers
//! - [`BeforeFilters`] and [`RouteFilters`] - which filters run for which
//!   `(url, action)` pair
//! - [`EventBus`] - request lifecycle notifications

#![doc(html_root_url = "https://docs.rs/minos-controller/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod controller;
mod events;
mod failure;
mod filters;
mod render;
mod services;

#[cfg(test)]
mod testing;

pub use context::ActionContext;
pub use controller::{invoke_action, ActionResult, Controller};
pub use events::{ControllerEvent, EventBus};
pub use failure::{DEFAULT_ERROR_MESSAGE, ERROR_LAYOUT, ERROR_TEMPLATE};
pub use filters::{BeforeFilters, FilterScope, RouteFilters};
pub use render::DEFAULT_LAYOUT;
pub use services::ControllerServices;
