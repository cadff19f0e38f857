//! # Minos Filter
//!
//! Before-filters run ahead of controller actions.
//!
//! Filters are discovered from a directory and resolved by name through a
//! [`FilterCatalog`]. A [`FilterChain`] runs a named subset of the loaded
//! filters strictly in order and stops at the first rejection.
//!
//! ```rust
//! use minos_core::{MinosError, Request, Response};
//! use minos_filter::{FilterCatalog, FilterChain, FnFilter};
//! use http::{Method, Uri};
//!
//! # tokio_test::block_on(async {
//! let catalog = FilterCatalog::new().register(
//!     "deny",
//!     FnFilter::new(|_request, _response| {
//!         Box::pin(async { Err(MinosError::action("denied")) })
//!     }),
//! );
//!
//! let chain = FilterChain::new();
//! chain.install(&catalog);
//!
//! let mut request = Request::new(Method::GET, Uri::from_static("/"));
//! let mut response = Response::new();
//!
//! let err = chain.run(&["deny"], &mut request, &mut response).await.unwrap_err();
//! assert!(matches!(err, MinosError::FilterRejected { .. }));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/minos-filter/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chain;
mod filter;

pub use chain::FilterChain;
pub use filter::{Filter, FilterCatalog, FnFilter};
