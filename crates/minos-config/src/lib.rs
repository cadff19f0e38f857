//! Environment-aware configuration for Minos.
//!
//! Configuration is a tree of JSON values addressed by dotted paths such as
//! `api.ratelimit`. Any object in the raw tree may carry per-environment
//! variants:
//!
//! ```json
//! {
//!   "port": 8080,
//!   "max_requests": { "production": 1000, "default": 0 }
//! }
//! ```
//!
//! Loading for `production` yields `max_requests = 1000`; every other
//! environment falls back to `default`.
//!
//! # Example
//!
//! ```no_run
//! use minos_config::ConfigLoader;
//!
//! # fn main() -> Result<(), minos_config::ConfigError> {
//! let config = ConfigLoader::new("production")
//!     .with_optional_file("config/app.json")?
//!     .with_env_prefix("MINOS")
//!     .load()?;
//!
//! let port = config.get_u64("port")?;
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/minos-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{process_configs, Config};
pub use error::ConfigError;
pub use loader::ConfigLoader;
