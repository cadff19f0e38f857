//! # Minos
//!
//! **Convention-based MVC request dispatch**
//!
//! Minos turns a directory of controllers into REST routes:
//!
//! - A controller at `lib/controllers/foo/bar.rs` answers the seven resource
//!   actions under `/foo/bar` and `/foo/:fooId/bar`
//! - Before-filters, declared per controller and per action, run in order and
//!   stop at the first rejection
//! - Failures, panics and timeouts all land in the controller's error handler
//! - An optional `error` controller catches whatever nothing else handled
//! - Workers can be recycled after a jittered number of requests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minos::prelude::*;
//!
//! #[derive(Default)]
//! struct Users;
//!
//! impl Controller for Users {
//!     fn show<'a>(&'a self, ctx: &'a mut ActionContext) -> BoxFuture<'a, ActionResult> {
//!         Box::pin(async move {
//!             let id = ctx.param("userId").unwrap_or_default().to_string();
//!             ctx.render("users/show", serde_json::json!({ "id": id }))?;
//!             Ok(Flow::Handled)
//!         })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = App::new(AppOptions::new(".").port(3000))
//!         .controllers(ControllerCatalog::new().register::<Users>("users"));
//!
//!     app.initialize()?;
//!     app.listen().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → route match → before-filters → action ──→ Response
//!                              ↓              ↓ Next
//!                        handle_error     next matching route → … → error controller
//! ```

#![doc(html_root_url = "https://docs.rs/minos/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use minos_config as config;
pub use minos_controller as controller;
pub use minos_core as core;
pub use minos_dispatch as dispatch;
pub use minos_filter as filter;
pub use minos_router as router;
pub use minos_server as server;
pub use minos_telemetry as telemetry;
pub use minos_view as view;

/// Prelude module for convenient imports.
///
/// ```rust
/// use minos::prelude::*;
/// ```
pub mod prelude {
    pub use minos_config::{Config, ConfigLoader};
    pub use minos_controller::{
        ActionContext, ActionResult, BeforeFilters, Controller, ControllerEvent,
    };
    pub use minos_core::{
        BoxFuture, Environment, Flow, MinosError, MinosResult, Request, RequestContext, Response,
    };
    pub use minos_dispatch::{ControllerCatalog, ProcessControl};
    pub use minos_filter::{Filter, FilterCatalog, FnFilter};
    pub use minos_router::Action;
    pub use minos_server::{App, AppOptions, ServerError};
    pub use minos_telemetry::{init_telemetry, TelemetryConfig};
    pub use minos_view::{MixinCatalog, TemplateMixin};
}
