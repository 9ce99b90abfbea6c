//! Prelude module for convenient imports.
//!
//! ```ignore
//! use roundhook::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Error, HookTransport, Hooks, HttpClient, HttpClientExt, HyperClient, Method,
    Request, RequestBuilder, Response, Result,
};
#[cfg(feature = "logging")]
pub use crate::{LoggingHooks, RequestTrace, Traced};
