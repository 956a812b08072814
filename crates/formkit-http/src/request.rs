//! HTTP request type.
//!
//! [`HttpRequest`] exposes what a form builder needs from the current
//! request: the method, the path used as the default form action, and the
//! submitted GET/POST data used to refill fields.

use std::collections::BTreeMap;

use http::{HeaderMap, Method};

use crate::querydict::QueryDict;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An incoming HTTP request.
///
/// # Examples
///
/// ```
/// use formkit_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::POST)
///     .path("/users/")
///     .form_body("email=ada%40example.com")
///     .build();
///
/// assert_eq!(request.path(), "/users/");
/// assert_eq!(request.input("email"), Some("ada@example.com"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    get: QueryDict,
    post: QueryDict,
    headers: HeaderMap,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`] for constructing an `HttpRequest`.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from `http` request parts and the body bytes.
    ///
    /// URL-encoded bodies are parsed into the POST dictionary; any other
    /// content type leaves it empty.
    pub fn from_parts(parts: http::request::Parts, body: &[u8]) -> Self {
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let query_string = parts.uri.query().unwrap_or("").to_string();

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            get: QueryDict::parse(&query_string),
            post: parse_body(content_type.as_deref(), body),
            query_string,
            content_type,
            headers: parts.headers,
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the method the client meant to use.
    ///
    /// Browsers can only submit GET and POST, so a POST carrying a recognised
    /// verb in `method_field` is treated as that verb.
    pub fn effective_method(&self, method_field: &str) -> Method {
        if self.method != Method::POST {
            return self.method.clone();
        }
        self.post
            .get(method_field)
            .map(str::to_uppercase)
            .and_then(|m| match m.as_str() {
                "PUT" => Some(Method::PUT),
                "PATCH" => Some(Method::PATCH),
                "DELETE" => Some(Method::DELETE),
                _ => None,
            })
            .unwrap_or(Method::POST)
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the GET query parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.get
    }

    /// Returns the POST form parameters.
    pub const fn post(&self) -> &QueryDict {
        &self.post
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the submitted value for `name`, preferring the body over the
    /// query string.
    pub fn input(&self, name: &str) -> Option<&str> {
        self.post.get(name).or_else(|| self.get.get(name))
    }

    /// Returns every submitted field as `name -> last value`.
    ///
    /// Body fields override query string fields of the same name.
    pub fn all(&self) -> BTreeMap<String, String> {
        self.get
            .iter_last()
            .chain(self.post.iter_last())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

fn parse_body(content_type: Option<&str>, body: &[u8]) -> QueryDict {
    if content_type.is_some_and(|ct| ct.starts_with(FORM_URLENCODED)) {
        QueryDict::parse(&String::from_utf8_lossy(body))
    } else {
        QueryDict::new()
    }
}

/// A builder for constructing [`HttpRequest`] instances, mainly for tests.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets a URL-encoded form body and the matching content type.
    #[must_use]
    pub fn form_body(self, body: &str) -> Self {
        self.content_type(FORM_URLENCODED).body(body.as_bytes().to_vec())
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            get: QueryDict::parse(&self.query_string),
            post: parse_body(self.content_type.as_deref(), &self.body),
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            headers: self.headers,
        }
    }
}
