//! Inbound request model.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Extensions, Method, Uri};
use minos_router::Params;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::{MinosError, MinosResult};

/// A buffered HTTP request as seen by filters and controllers.
///
/// Route parameters and the matched pattern are filled in by the host router
/// before a handler runs. The [`RequestContext`] is attached by the
/// dispatcher. Filters hand typed data to actions through
/// [`extensions_mut`](Self::extensions_mut).
///
/// # Example
///
/// ```
/// use minos_core::Request;
/// use http::Method;
///
/// let request = Request::new(Method::GET, "/users?page=2".parse().unwrap())
///     .with_header("x-requested-with", "XMLHttpRequest");
///
/// assert_eq!(request.path(), "/users");
/// assert_eq!(request.url(), "/users?page=2");
/// assert_eq!(request.query().get("page").map(String::as_str), Some("2"));
/// assert!(request.is_xhr());
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
    route: Option<String>,
    context: Option<RequestContext>,
    extensions: Extensions,
}

impl Request {
    /// Creates a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Params::new(),
            route: None,
            context: None,
            extensions: Extensions::new(),
        }
    }

    /// Converts a buffered `http` request.
    #[must_use]
    pub fn from_http(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: Params::new(),
            route: None,
            context: None,
            extensions: parts.extensions,
        }
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Path plus query string, as the client sent it.
    #[must_use]
    pub fn url(&self) -> &str {
        self.uri
            .path_and_query()
            .map_or_else(|| self.uri.path(), |pq| pq.as_str())
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First value of a header, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Route parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// A single route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Sets route parameters. Called by the host router.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Pattern of the matched route, e.g. `/users/:userId`.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Sets the matched pattern. Called by the host router.
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Dispatch context, once attached.
    #[must_use]
    pub const fn context(&self) -> Option<&RequestContext> {
        self.context.as_ref()
    }

    /// Attaches the dispatch context.
    pub fn set_context(&mut self, context: RequestContext) {
        self.context = Some(context);
    }

    /// Typed per-request data.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable typed per-request data.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Whether the request was made with `X-Requested-With: XMLHttpRequest`.
    #[must_use]
    pub fn is_xhr(&self) -> bool {
        self.header("x-requested-with")
            .is_some_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
    }

    /// Decoded query string. Later duplicates win.
    #[must_use]
    pub fn query(&self) -> BTreeMap<String, String> {
        self.uri
            .query()
            .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
            .map(|pairs| pairs.into_iter().collect())
            .unwrap_or_default()
    }

    /// Deserializes a JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> MinosResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| MinosError::action(format!("invalid JSON body: {e}")))
    }

    /// Deserializes a form-encoded body.
    pub fn form<T: DeserializeOwned>(&self) -> MinosResult<T> {
        serde_urlencoded::from_bytes(&self.body)
            .map_err(|e| MinosError::action(format!("invalid form body: {e}")))
    }

    /// Best-effort structured view of the body for logging and templates.
    ///
    /// JSON and form bodies are decoded. Anything else is returned as text,
    /// and an empty body is an empty object.
    #[must_use]
    pub fn body_value(&self) -> Value {
        if self.body.is_empty() {
            return Value::Object(serde_json::Map::new());
        }

        let content_type = self
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            if let Ok(value) = serde_json::from_slice(&self.body) {
                return value;
            }
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            if let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&self.body) {
                return Value::Object(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                );
            }
        }

        Value::String(String::from_utf8_lossy(&self.body).into_owned())
    }
}
