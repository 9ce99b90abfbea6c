//! Tower middleware.
//!
//! [`HookLayer`] runs the same before/after chain as [`crate::HookTransport`],
//! but around any `tower::Service<Request<Bytes>>`. Use it to put hooks inside
//! a [`crate::HyperClient`] layer stack:
//!
//! ```ignore
//! use roundhook::{Hooks, HyperClient};
//! use roundhook::middleware::HookLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(HookLayer::new(Hooks::<()>::new().after(|_, outcome, ()| {
//!         tracing::debug!(ok = outcome.is_ok(), "exchange");
//!     })))
//!     .build();
//! ```

mod hooks;

pub use hooks::{HookLayer, HookService};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
