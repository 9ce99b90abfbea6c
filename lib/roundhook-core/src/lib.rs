//! Core types and traits for roundhook.
//!
//! - [`Method`], [`Request`], [`RequestBuilder`], [`Response`] - the exchange
//! - [`Error`] and [`Result`] - executor failures
//! - [`HttpClient`] - the single "perform the request" operation
//! - [`Hooks`], [`BeforeHook`], [`AfterHook`] - the hook chain contracts

mod body;
mod client;
mod error;
mod hook;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{JSON_CONTENT_TYPE, from_json, to_json};
pub use client::{HttpClient, HttpClientExt};
pub use error::{Error, Result};
pub use hook::{AfterHook, BeforeHook, Hooks};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
