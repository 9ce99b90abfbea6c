//! HTTP responses.
//!
//! A [`Response`] is only ever produced by an executor. After hooks see it by
//! shared reference and the transport hands it back to the caller untouched.

use std::collections::HashMap;

use bytes::Bytes;

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Canonical reason phrase for the status, if the code is known.
    #[must_use]
    pub fn reason(&self) -> Option<&'static str> {
        http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

impl Response<Bytes> {
    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Body as text.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn status_classes() {
        let ok = Response::new(204, HashMap::new(), Bytes::new());
        check!(ok.is_success());
        check!(ok.reason() == Some("No Content"));

        let missing = Response::new(404, HashMap::new(), Bytes::new());
        check!(missing.is_client_error());
        check!(!missing.is_success());

        let broken = Response::new(503, HashMap::new(), Bytes::new());
        check!(broken.is_server_error());

        let odd = Response::new(599, HashMap::new(), Bytes::new());
        check!(odd.reason().is_none());
    }

    #[test]
    fn body_accessors() {
        let headers = HashMap::from([("Content-Type".to_string(), "application/json".to_string())]);
        let response = Response::new(200, headers, Bytes::from_static(br#"{"count":3}"#));

        check!(response.header("Content-Type") == Some("application/json"));
        check!(response.text() == Ok(r#"{"count":3}"#));

        let value: serde_json::Value = response.json().expect("json");
        check!(value["count"] == 3);

        let_assert!(Err(_) = response.json::<Vec<u8>>());
        check!(response.into_body().len() == 11);
    }
}
