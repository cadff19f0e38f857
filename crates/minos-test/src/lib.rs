//! # Minos Test
//!
//! In-memory testing for Minos applications. A [`TestClient`] sends requests
//! straight into a bound [`HttpRoutes`](minos_server::HttpRoutes), so
//! controllers, filters and the error route run exactly as they would behind
//! the HTTP server, without binding a port.
//!
//! ```ignore
//! let routes = app.routes()?;
//! let client = TestClient::new(routes);
//!
//! let response = client.get("/users/42").send().await;
//! response.assert_status(StatusCode::OK).assert_body_contains("42");
//! ```

#![doc(html_root_url = "https://docs.rs/minos-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
