//! Route binding contract between the dispatcher and the host server.
//!
//! The dispatcher only needs to attach a handler to a `(method, pattern)`
//! pair. Handlers may decline a request by handing it back together with the
//! response built so far, in which case the host tries the next matching
//! binding with that same response.

use std::future::Future;
use std::sync::Arc;

use http::Method;
use minos_router::{RoutePattern, Router};

use crate::request::Request;
use crate::response::Response;
use crate::BoxFuture;

/// Result of a bound handler.
#[derive(Debug)]
pub enum Routed {
    /// The handler produced a response.
    Response(Response),
    /// The handler declined; the request and its response continue to the
    /// next binding.
    Next(Request, Response),
}

/// A handler bound to a route.
pub type RouteHandler = Arc<dyn Fn(Request, Response) -> BoxFuture<'static, Routed> + Send + Sync>;

/// Wraps an async closure as a [`RouteHandler`].
///
/// # Example
///
/// ```
/// use minos_core::{route_handler, Response, Routed};
///
/// let handler = route_handler(|_request, mut response: Response| async move {
///     response.send_text("ok");
///     Routed::Response(response)
/// });
/// # let _ = handler;
/// ```
pub fn route_handler<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Routed> + Send + 'static,
{
    Arc::new(move |request, response| Box::pin(f(request, response)))
}

/// Something routes can be bound to.
pub trait RouteBinder {
    /// Binds `handler` to `method` requests matching `pattern`.
    fn bind(&mut self, method: Method, pattern: RoutePattern, handler: RouteHandler);
}

impl RouteBinder for Router<RouteHandler> {
    fn bind(&mut self, method: Method, pattern: RoutePattern, handler: RouteHandler) {
        self.add(method, pattern, handler);
    }
}

/// Offers `request` to every matching binding in registration order.
///
/// Params and the matched pattern are set on the request before each handler
/// runs. Every handler sees the response left by the one before it. Returns
/// [`Routed::Next`] when every binding declined or none matched.
pub async fn route_request(router: &Router<RouteHandler>, mut request: Request) -> Routed {
    let mut response = Response::new();
    let method = request.method().clone();
    let path = request.path().to_string();

    for found in router.matches(&method, &path) {
        request.set_params(found.params);
        request.set_route(found.pattern.as_str());

        match (found.handler)(request, response).await {
            Routed::Next(declined, carried) => {
                request = declined;
                response = carried;
            }
            handled @ Routed::Response(_) => return handled,
        }
    }

    Routed::Next(request, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder(body: &'static str) -> RouteHandler {
        route_handler(move |_request, mut response: Response| async move {
            response.send_text(body);
            Routed::Response(response)
        })
    }

    fn decliner() -> RouteHandler {
        route_handler(|request, response| async move { Routed::Next(request, response) })
    }

    fn get(path: &str) -> Request {
        Request::new(Method::GET, path.parse().unwrap())
    }

    fn body(routed: Routed) -> String {
        match routed {
            Routed::Response(response) => {
                String::from_utf8(response.body().unwrap().to_vec()).unwrap()
            }
            Routed::Next(..) => panic!("request was not handled"),
        }
    }

    #[tokio::test]
    async fn test_first_match_handles() {
        let mut router = Router::new();
        router.bind(Method::GET, RoutePattern::path("/a"), responder("first"));
        router.bind(Method::GET, RoutePattern::path("/a"), responder("second"));

        assert_eq!(body(route_request(&router, get("/a")).await), "first");
    }

    #[tokio::test]
    async fn test_declined_request_falls_through() {
        let mut router = Router::new();
        router.bind(Method::GET, RoutePattern::path("/a"), decliner());
        router.bind(Method::GET, RoutePattern::path("/:name"), responder("param"));

        assert_eq!(body(route_request(&router, get("/a")).await), "param");
    }

    #[tokio::test]
    async fn test_unmatched_returns_request() {
        let router: Router<RouteHandler> = Router::new();

        match route_request(&router, get("/missing")).await {
            Routed::Next(request, _) => assert_eq!(request.path(), "/missing"),
            Routed::Response(_) => panic!("nothing should handle this"),
        }
    }

    #[tokio::test]
    async fn test_params_set_before_handler() {
        let mut router = Router::new();
        router.bind(
            Method::GET,
            RoutePattern::path("/users/:userId"),
            route_handler(|request, mut response: Response| async move {
                let text = format!(
                    "{} {}",
                    request.route().unwrap_or_default(),
                    request.param("userId").unwrap_or_default()
                );
                response.send_text(text);
                Routed::Response(response)
            }),
        );

        assert_eq!(
            body(route_request(&router, get("/users/5")).await),
            "/users/:userId 5"
        );
    }

    #[tokio::test]
    async fn test_response_carried_through_fall_through() {
        let mut router = Router::new();
        router.bind(
            Method::GET,
            RoutePattern::path("/a"),
            route_handler(|request, mut response: Response| async move {
                response.set_header("x-seen", http::HeaderValue::from_static("yes"));
                Routed::Next(request, response)
            }),
        );
        router.bind(Method::GET, RoutePattern::path("/:name"), responder("param"));

        match route_request(&router, get("/a")).await {
            Routed::Response(response) => {
                assert_eq!(response.headers()["x-seen"], "yes");
                assert_eq!(response.body().unwrap().as_ref(), b"param");
            }
            Routed::Next(..) => panic!("request was not handled"),
        }
    }
}
