//! Fetch request and response models
//!
//! The worker's view of an outbound request from a controlled page and of
//! the whole response (status, headers, body) that gets cached or returned.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;
use url::Url;

// == Fetch Request ==
/// An outbound request intercepted by the worker.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Full request URL, including origin
    pub url: Url,
}

impl FetchRequest {
    /// Creates a request for the given URL.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parses a request URL from a string.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(input)?))
    }

    /// Returns the cache key for this request: the URL with any fragment
    /// stripped (scheme + host + path + query).
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

// == Fetch Response ==
/// A whole HTTP response: status, headers, and body.
///
/// Header names are stored lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    // == Constructors ==
    /// Creates a response with the given status and body, no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Adds a header, lowercasing the name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    /// Creates a 200 `text/html` response.
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(200, body.into().into_bytes()).with_header("content-type", "text/html")
    }

    /// Creates a `text/plain` response with the given status.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body.into().into_bytes()).with_header("content-type", "text/plain")
    }

    /// Creates a 200 `application/json` response from a serializable value.
    pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(200, body).with_header("content-type", "application/json"))
    }

    // == Accessors ==
    /// Returns true for a 2xx status, mirroring `Response.ok`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the content-type header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
