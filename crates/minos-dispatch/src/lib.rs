//! # Minos Dispatch
//!
//! Connects discovered controllers to the host server and runs every request
//! through its lifecycle:
//!
//! 1. [`ControllerRegistry`] finds controller sources and resolves them
//!    through a [`ControllerCatalog`]
//! 2. [`Dispatcher::load`] binds the REST routes of every controller, nested
//!    resources first, and the optional catch-all error route last
//! 3. each bound handler attaches a request context, counts the request
//!    against the [`WorkerBudget`], runs the before-filters and the action
//!    under a timeout, and hands any failure to the controller's error hook
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use minos_config::Config;
//! use minos_controller::{Controller, ControllerServices};
//! use minos_core::{Environment, RouteHandler};
//! use minos_dispatch::{ControllerCatalog, Dispatcher, ProcessControl};
//! use minos_router::Router;
//! use minos_view::MiniJinjaEngine;
//!
//! #[derive(Default)]
//! struct Users;
//! impl Controller for Users {}
//!
//! struct Exit;
//! impl ProcessControl for Exit {
//!     fn request_shutdown(&self) {}
//!     fn terminate(&self, code: i32) {
//!         std::process::exit(code)
//!     }
//! }
//!
//! let services = Arc::new(ControllerServices::new(
//!     Config::new(),
//!     Environment::from_env(),
//!     Arc::new(MiniJinjaEngine::new("lib/views")),
//! ));
//! let catalog = ControllerCatalog::new().register::<Users>("users");
//! let dispatcher = Dispatcher::builder(services, catalog, Arc::new(Exit)).build();
//!
//! let mut router: Router<RouteHandler> = Router::new();
//! dispatcher.load(&mut router, Path::new("lib/controllers"))?;
//! # Ok::<(), minos_core::MinosError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/minos-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod budget;
mod catalog;
mod dispatcher;
mod naming;
mod process;
mod registry;

pub use budget::{apply_jitter, WorkerBudget, MAX_REQUESTS_KEY, MAX_REQUEST_JITTER};
pub use catalog::{ControllerCatalog, ControllerFactory};
pub use dispatcher::{
    DispatchOptions, Dispatcher, DispatcherBuilder, DEFAULT_CONTROLLER_TIMEOUT,
    ERROR_ROUTE_PATTERN,
};
pub use naming::{controller_parts, page_for, ERROR_URL};
pub use process::ProcessControl;
pub use registry::{ControllerDescriptor, ControllerRegistry};
