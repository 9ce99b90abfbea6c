//! Prelude module for convenient imports.
//!
//! ```ignore
//! use roundhook_core::prelude::*;
//! ```

pub use crate::{
    AfterHook, BeforeHook, Error, Hooks, HttpClient, HttpClientExt, Method, Request,
    RequestBuilder, Response, Result,
};
