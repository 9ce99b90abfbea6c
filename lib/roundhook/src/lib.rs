//! Before/after hooks around an HTTP client's request execution.
//!
//! [`HookTransport`] wraps a base executor (any [`HttpClient`], by default a
//! [`HyperClient`]) and runs:
//!
//! - its before hooks, in order, each returning the request to use next;
//! - the base executor, with the final request;
//! - its after hooks, in order, with the final request and the outcome.
//!
//! The outcome is returned unchanged. Connection pooling, TLS, and timeouts
//! stay in the base executor.
//!
//! # Example
//!
//! ```ignore
//! use roundhook::prelude::*;
//!
//! let transport = HookTransport::builder()
//!     .before(|mut request, ()| {
//!         request.headers_mut().insert("X-Request-Source".into(), "batch".into());
//!         request
//!     })
//!     .after(|request, outcome, ()| match outcome {
//!         Ok(response) => tracing::info!(url = %request.url(), status = response.status()),
//!         Err(err) => tracing::warn!(url = %request.url(), error = %err),
//!     })
//!     .build();
//!
//! let response = transport.get("https://example.com").await?;
//! ```

mod client;
mod config;
mod connector;
#[cfg(feature = "logging")]
mod logging;
pub mod middleware;
pub mod prelude;
mod transport;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
#[cfg(feature = "logging")]
pub use logging::{LogLevel, LoggingHooks, RequestTrace, Traced};
pub use transport::{HookTransport, HookTransportBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use roundhook_core::{
    AfterHook, BeforeHook, Error, Hooks, HttpClient, HttpClientExt, JSON_CONTENT_TYPE, Method,
    Request, RequestBuilder, Response, Result, StatusCode, from_json, header, to_json,
};

pub use url;
