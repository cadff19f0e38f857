//! # Minos Server
//!
//! Hosts a Minos application over HTTP:
//!
//! - [`HttpRoutes`] - the ordered route set controllers are bound to, with the
//!   `404 Cannot {METHOD} {path}` fallback
//! - [`Server`] - HTTP/1.1 via Hyper with graceful shutdown
//! - [`ShutdownSignal`] - the process control handed to the dispatcher
//! - [`App`] - loads configuration, mixins, filters and controllers from an
//!   application directory and serves them
//!
//! ## Example
//!
//! ```rust,no_run
//! use minos_dispatch::ControllerCatalog;
//! use minos_server::{App, AppOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = App::new(AppOptions::new(env!("CARGO_MANIFEST_DIR")))
//!         .controllers(ControllerCatalog::new());
//!
//!     app.initialize()?;
//!     app.listen().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/minos-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod error;
mod router;
mod server;
pub mod shutdown;

pub use app::{App, AppOptions, ENV_PREFIX, SHUTDOWN_MESSAGE};
pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HOSTNAME, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::ServerError;
pub use router::HttpRoutes;
pub use server::{HttpResponse, Server};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
