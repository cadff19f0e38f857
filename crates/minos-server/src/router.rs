//! The server's route set.
//!
//! [`HttpRoutes`] is what controllers get bound to. Requests are offered to
//! every matching binding in registration order; a handler that falls through
//! hands the request and its response to the next one. When nothing handles a
//! request the server answers `404 Cannot {METHOD} {path}`, keeping any headers
//! set along the way.
//!
//! # Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use minos_core::{route_handler, Request, Response, RouteBinder, Routed};
//! use minos_router::RoutePattern;
//! use minos_server::HttpRoutes;
//!
//! let mut routes = HttpRoutes::new();
//! routes.bind(
//!     Method::GET,
//!     RoutePattern::path("/hello"),
//!     route_handler(|_request, mut response: Response| async move {
//!         response.send_text("hi");
//!         Routed::Response(response)
//!     }),
//! );
//!
//! let response = tokio_test::block_on(
//!     routes.handle(Request::new(Method::GET, "/nope".parse().unwrap())),
//! );
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! ```

use http::{Method, StatusCode};
use minos_core::{route_request, Request, Response, RouteBinder, RouteHandler, Routed};
use minos_router::{RoutePattern, Router};

/// Ordered bindings plus the not-found fallback.
#[derive(Default)]
pub struct HttpRoutes {
    router: Router<RouteHandler>,
}

impl HttpRoutes {
    /// Creates an empty route set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.route_count()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }

    /// Bound `(method, pattern)` pairs in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = (&Method, &RoutePattern)> {
        self.router.bindings()
    }

    /// Runs `request` through the bindings and always produces a response.
    pub async fn handle(&self, request: Request) -> Response {
        match route_request(&self.router, request).await {
            Routed::Response(response) => response,
            Routed::Next(request, response) => {
                not_found(request.method(), request.path(), response)
            }
        }
    }
}

impl RouteBinder for HttpRoutes {
    fn bind(&mut self, method: Method, pattern: RoutePattern, handler: RouteHandler) {
        self.router.bind(method, pattern, handler);
    }
}

fn not_found(method: &Method, path: &str, mut response: Response) -> Response {
    tracing::debug!(%method, path, "no route handled the request");
    response.set_status(StatusCode::NOT_FOUND);
    response.send_text(format!("Cannot {method} {path}"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use minos_core::route_handler;

    fn text(body: &'static str) -> RouteHandler {
        route_handler(move |_request, mut response: Response| async move {
            response.send_text(body);
            Routed::Response(response)
        })
    }

    fn get(path: &str) -> Request {
        Request::new(Method::GET, path.parse().unwrap())
    }

    fn body(response: &Response) -> &[u8] {
        response.body().map(|b| b.as_ref()).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_first_binding_wins() {
        let mut routes = HttpRoutes::new();
        routes.bind(Method::GET, RoutePattern::path("/a"), text("first"));
        routes.bind(Method::GET, RoutePattern::path("/a"), text("second"));

        let response = routes.handle(get("/a")).await;
        assert_eq!(body(&response), b"first");
        assert_eq!(routes.len(), 2);
    }

    #[tokio::test]
    async fn test_fall_through_to_next_binding() {
        let mut routes = HttpRoutes::new();
        routes.bind(
            Method::GET,
            RoutePattern::path("/a"),
            route_handler(|request, response| async move { Routed::Next(request, response) }),
        );
        routes.bind(Method::GET, RoutePattern::path("/:page"), text("page"));

        let response = routes.handle(get("/a")).await;
        assert_eq!(body(&response), b"page");
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut routes = HttpRoutes::new();
        routes.bind(Method::GET, RoutePattern::path("/a"), text("a"));

        let response = routes
            .handle(Request::new(Method::POST, "/a?x=1".parse().unwrap()))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&response), b"Cannot POST /a");
    }

    #[tokio::test]
    async fn test_not_found_keeps_headers_from_declined_handlers() {
        let mut routes = HttpRoutes::new();
        routes.bind(
            Method::GET,
            RoutePattern::path("/a"),
            route_handler(|request, mut response: Response| async move {
                response.set_header("set-cookie", http::HeaderValue::from_static("seen=1"));
                Routed::Next(request, response)
            }),
        );

        let response = routes.handle(get("/a")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["set-cookie"], "seen=1");
        assert_eq!(body(&response), b"Cannot GET /a");
    }
}
