//! Error types for roundhook.
//!
//! Every failure a caller observes comes from the base executor (or from code
//! building a request). The hook transport never produces an error of its own.

use derive_more::{Display, Error, From};

/// Failure returned by an executor.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The connection could not be established or broke mid-exchange.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The executor gave up waiting for a response.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// Path of the failing field (e.g. `user.address.city`).
        path: String,
        /// Error message.
        message: String,
    },

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this is a TLS error.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn display_messages() {
        check!(Error::Timeout.to_string() == "request timeout");
        check!(Error::connection("refused").to_string() == "connection error: refused");
        check!(Error::tls("bad certificate").to_string() == "TLS error: bad certificate");
        check!(
            Error::json_deserialization("user.id", "invalid type").to_string()
                == "JSON deserialization error at 'user.id': invalid type"
        );
    }

    #[test]
    fn predicates() {
        check!(Error::Timeout.is_timeout());
        check!(!Error::Timeout.is_connection());
        check!(Error::connection("refused").is_connection());
        check!(!Error::invalid_request("no host").is_timeout());
        check!(Error::tls("corrupt message").is_tls());
        check!(!Error::tls("corrupt message").is_connection());
    }

    #[test]
    fn url_errors_convert() {
        let err: Error = url::Url::parse("not a url").expect_err("invalid").into();
        check!(err.to_string().starts_with("invalid URL"));
    }
}
