//! Test request building.
//!
//! Errors from header, JSON or form helpers are kept until
//! [`build`](TestRequestBuilder::build) so calls can be chained.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Uri};
use minos_core::Request;
use serde::Serialize;

use crate::error::TestError;

/// Builder for a [`Request`].
///
/// # Example
///
/// ```
/// use http::Method;
/// use minos_test::TestRequestBuilder;
///
/// let request = TestRequestBuilder::new(Method::POST, "/users?notify=1")
///     .json(&serde_json::json!({"name": "Alice"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.url(), "/users?notify=1");
/// assert_eq!(request.header("content-type"), Some("application/json"));
/// ```
#[must_use]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Starts a request.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Sets a header, replacing earlier values.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        match (
            HeaderName::try_from(name),
            HeaderValue::try_from(value.as_ref()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.fail(TestError::InvalidHeader(name.to_string())),
        }
        self
    }

    /// Marks the request as `XMLHttpRequest`.
    pub fn xhr(self) -> Self {
        self.header("x-requested-with", "XMLHttpRequest")
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and content type.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(e) => self.fail(e.into()),
        }
        self.header(CONTENT_TYPE.as_str(), "application/json")
    }

    /// Sets a form-urlencoded body and content type.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_urlencoded::to_string(value) {
            Ok(encoded) => self.body = Bytes::from(encoded),
            Err(e) => self.fail(TestError::RequestBuild(format!("form encoding failed: {e}"))),
        }
        self.header(CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded")
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        let mut request = Request::new(self.method, uri).with_body(self.body);
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    fn fail(&mut self, error: TestError) {
        self.error.get_or_insert(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_invalid_uri() {
        let err = TestRequestBuilder::new(Method::GET, "not a uri")
            .build()
            .unwrap_err();
        assert!(matches!(err, TestError::RequestBuild(_)));
    }

    #[test]
    fn test_invalid_header_is_reported_on_build() {
        let err = TestRequestBuilder::new(Method::GET, "/")
            .header("bad header", "x")
            .header("x-ok", "y")
            .build()
            .unwrap_err();
        assert!(matches!(err, TestError::InvalidHeader(name) if name == "bad header"));
    }

    #[test]
    fn test_form_body() {
        #[derive(Serialize)]
        struct Login<'a> {
            user: &'a str,
            remember: bool,
        }

        let request = TestRequestBuilder::new(Method::POST, "/sessions")
            .form(&Login {
                user: "ann",
                remember: true,
            })
            .build()
            .unwrap();

        assert_eq!(request.body().as_ref(), b"user=ann&remember=true");
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_xhr() {
        let request = TestRequestBuilder::new(Method::GET, "/").xhr().build().unwrap();
        assert!(request.is_xhr());
    }
}
