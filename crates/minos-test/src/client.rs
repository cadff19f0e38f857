//! In-memory client over a bound route set.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use minos_server::HttpRoutes;
use serde::Serialize;

use crate::error::TestError;
use crate::request::TestRequestBuilder;
use crate::response::TestResponse;

/// Sends requests straight into an [`HttpRoutes`] without a socket.
///
/// Requests take the same path as over HTTP: bindings in order, fall-through,
/// then the `404 Cannot {METHOD} {path}` fallback.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode};
/// use minos_core::{route_handler, Response, RouteBinder, Routed};
/// use minos_router::RoutePattern;
/// use minos_server::HttpRoutes;
/// use minos_test::TestClient;
///
/// let mut routes = HttpRoutes::new();
/// routes.bind(
///     Method::GET,
///     RoutePattern::path("/ping"),
///     route_handler(|_request, mut response: Response| async move {
///         response.send_text("pong");
///         Routed::Response(response)
///     }),
/// );
///
/// let client = TestClient::new(routes);
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let response = client.get("/ping").send().await;
/// assert_eq!(response.text().unwrap(), "pong");
///
/// client.get("/pong").send().await.assert_status(StatusCode::NOT_FOUND);
/// # });
/// ```
#[must_use]
#[derive(Clone)]
pub struct TestClient {
    routes: Arc<HttpRoutes>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client for `routes`.
    pub fn new(routes: HttpRoutes) -> Self {
        Self {
            routes: Arc::new(routes),
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The route set requests go to.
    #[must_use]
    pub fn routes(&self) -> &HttpRoutes {
        &self.routes
    }

    /// Starts a `GET` request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a `POST` request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let builder = self
            .default_headers
            .iter()
            .fold(TestRequestBuilder::new(method, uri), |builder, (name, value)| {
                builder.header(name, value)
            });

        TestClientRequest {
            client: self,
            builder,
        }
    }
}

/// A request bound to a [`TestClient`].
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Marks the request as `XMLHttpRequest`.
    pub fn xhr(mut self) -> Self {
        self.builder = self.builder.xhr();
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sets a form body.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.form(value);
        self
    }

    /// Sends the request.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        Ok(self.client.routes.handle(request).await.into())
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("could not send test request: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use minos_core::{route_handler, Response, RouteBinder, Routed};
    use minos_router::RoutePattern;
    use serde_json::json;

    fn echo() -> HttpRoutes {
        let mut routes = HttpRoutes::new();
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            routes.bind(
                method,
                RoutePattern::path("/echo/:id"),
                route_handler(|request, mut response: Response| async move {
                    response
                        .send_json(&json!({
                            "method": request.method().as_str(),
                            "id": request.param("id"),
                            "xhr": request.is_xhr(),
                            "custom": request.header("x-custom"),
                            "body": request.body_value(),
                        }))
                        .unwrap();
                    Routed::Response(response)
                }),
            );
        }
        routes
    }

    #[tokio::test]
    async fn test_all_methods() {
        let client = TestClient::new(echo());

        for (request, method) in [
            (client.get("/echo/1"), "GET"),
            (client.post("/echo/1"), "POST"),
            (client.put("/echo/1"), "PUT"),
            (client.delete("/echo/1"), "DELETE"),
        ] {
            let body = request.send().await.json_value().unwrap();
            assert_eq!(body["method"], method);
            assert_eq!(body["id"], "1");
        }
    }

    #[tokio::test]
    async fn test_headers_and_body() {
        let client = TestClient::new(echo()).with_default_header("x-custom", "default");

        let body = client
            .post("/echo/2")
            .xhr()
            .json(&json!({"name": "Alice"}))
            .send()
            .await
            .json_value()
            .unwrap();

        assert_eq!(body["xhr"], true);
        assert_eq!(body["custom"], "default");
        assert_eq!(body["body"]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_not_found() {
        let client = TestClient::new(echo());

        let response = client.get("/nothing").send().await;

        response
            .assert_status(StatusCode::NOT_FOUND)
            .assert_body_eq("Cannot GET /nothing");
    }

    #[tokio::test]
    async fn test_build_error() {
        let client = TestClient::new(echo());

        let err = client
            .get("/echo/1")
            .header("bad header", "x")
            .try_send()
            .await
            .unwrap_err();
        assert!(matches!(err, TestError::InvalidHeader(_)));
    }
}
