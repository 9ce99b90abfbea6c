//! Outgoing HTTP requests.
//!
//! Before hooks receive a [`Request`] by value and return the one to send, so
//! they can edit it in place through the `*_mut` accessors or rebuild it from
//! [`Request::into_parts`].
//!
//! # Example
//!
//! ```
//! use roundhook_core::{Method, Request};
//! use bytes::Bytes;
//!
//! let request = Request::<Bytes>::builder(Method::Get, "https://api.example.com".parse().unwrap())
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .build();
//! assert_eq!(request.url().as_str(), "https://api.example.com/?page=1");
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// An HTTP request with method, URL, headers, and optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// Reassemble a request from its parts.
    #[must_use]
    pub fn from_parts(
        method: Method,
        url: url::Url,
        headers: HashMap<String, String>,
        body: Option<B>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Mutable access to the URL.
    #[must_use]
    pub fn url_mut(&mut self) -> &mut url::Url {
        &mut self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    request: Request<B>,
}

impl<B> RequestBuilder<B> {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            request: Request::from_parts(method, url, HashMap::new(), None),
        }
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.request.headers.extend(headers);
        self
    }

    /// Appends a query parameter to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.request.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.request.body = Some(body);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        self.request
    }
}

impl RequestBuilder<Bytes> {
    /// Sets a JSON body and the matching `Content-Type`.
    pub fn json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("Content-Type", crate::body::JSON_CONTENT_TYPE)
            .body(body))
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    fn url(raw: &str) -> url::Url {
        url::Url::parse(raw).expect("valid URL")
    }

    #[test]
    fn builder_collects_headers_and_query() {
        let request = Request::<Bytes>::builder(Method::Get, url("https://api.example.com/search"))
            .header("Accept", "application/json")
            .headers([("X-Trace".to_string(), "abc".to_string())])
            .query("q", "rust hooks")
            .build();

        check!(request.method() == Method::Get);
        check!(request.url().as_str() == "https://api.example.com/search?q=rust+hooks");
        check!(request.header("Accept") == Some("application/json"));
        check!(request.header("X-Trace") == Some("abc"));
        check!(request.body().is_none());
    }

    #[test]
    fn json_sets_body_and_content_type() {
        let request = Request::<Bytes>::builder(Method::Post, url("https://api.example.com/orders"))
            .json(&serde_json::json!({"sku": "A-1"}))
            .expect("json")
            .build();

        check!(request.header("Content-Type") == Some("application/json"));
        check!(request.body() == Some(&Bytes::from_static(br#"{"sku":"A-1"}"#)));
    }

    #[test]
    fn parts_round_trip_keeps_edits() {
        let mut request = Request::builder(Method::Put, url("https://api.example.com/a"))
            .body(Bytes::from_static(b"payload"))
            .build();
        request.url_mut().set_path("/b");
        request
            .headers_mut()
            .insert("X-Edited".to_string(), "yes".to_string());

        let (method, target, headers, body) = request.clone().into_parts();
        let rebuilt = Request::from_parts(method, target, headers, body);

        check!(rebuilt == request);
        check!(rebuilt.url().path() == "/b");
        check!(rebuilt.header("X-Edited") == Some("yes"));
    }
}
