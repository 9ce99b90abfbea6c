//! The hook transport: before hooks, then the base executor, then after hooks.
//!
//! [`HookTransport`] decorates any [`HttpClient`] and is an [`HttpClient`]
//! itself, so it can be used wherever an executor is expected, including as
//! the base of another transport.
//!
//! For one dispatch:
//!
//! 1. a scratch record `S` is created with [`Default`];
//! 2. the request is folded through the before hooks, in registration order;
//! 3. the final request is handed to the base executor;
//! 4. every after hook runs, in registration order, with the final request,
//!    the executor outcome, and the scratch record;
//! 5. the executor outcome is returned as is.
//!
//! A panicking hook is not caught: it unwinds to the caller and the remaining
//! hooks of that dispatch do not run.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Instant;
//!
//! use roundhook::{HookTransport, HttpClientExt};
//!
//! #[derive(Default)]
//! struct Timing {
//!     started: Option<Instant>,
//! }
//!
//! let transport = HookTransport::builder_with_scratch::<Timing>()
//!     .before(|request, timing| {
//!         timing.started = Some(Instant::now());
//!         request
//!     })
//!     .after(|request, outcome, timing| {
//!         let elapsed = timing.started.map(|started| started.elapsed());
//!         tracing::info!(url = %request.url(), ?elapsed, ok = outcome.is_ok(), "done");
//!     })
//!     .build();
//!
//! let response = transport.get("https://example.com").await?;
//! ```

use std::fmt;
use std::future::Future;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower_service::Service;
use tracing::trace;

use crate::client::ServiceFuture;
use crate::{
    AfterHook, BeforeHook, Error, Hooks, HttpClient, HyperClient, Request, Response, Result,
};

/// Executor decorated with before and after hooks.
///
/// Immutable once built. Cloning is cheap when the base executor is: the hook
/// chain is shared.
pub struct HookTransport<C = HyperClient, S = ()> {
    base: C,
    hooks: Hooks<S>,
}

impl HookTransport {
    /// Builder with no scratch record and [`HyperClient::new`] as base executor.
    #[must_use]
    pub fn builder() -> HookTransportBuilder {
        HookTransportBuilder::new()
    }

    /// Builder whose hooks share a scratch record of type `S` per dispatch.
    #[must_use]
    pub fn builder_with_scratch<S>() -> HookTransportBuilder<HyperClient, S> {
        HookTransportBuilder::new()
    }
}

impl<C, S> HookTransport<C, S> {
    /// The base executor.
    #[must_use]
    pub const fn base(&self) -> &C {
        &self.base
    }

    /// The hook chain.
    #[must_use]
    pub const fn hooks(&self) -> &Hooks<S> {
        &self.hooks
    }
}

impl<C, S> HookTransport<C, S>
where
    C: HttpClient,
    S: Default + Send,
{
    /// Run one request through the hooks and the base executor.
    ///
    /// Returns exactly what the base executor returned.
    pub async fn dispatch(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        trace!(
            method = %request.method(),
            url = %request.url(),
            before = self.hooks.before_len(),
            after = self.hooks.after_len(),
            "dispatching through hooks"
        );

        let outcome = self
            .hooks
            .around(request, |request| self.base.execute(request))
            .await;

        trace!(ok = outcome.is_ok(), "hooks done");
        outcome
    }
}

impl<C, S> HttpClient for HookTransport<C, S>
where
    C: HttpClient,
    S: Default + Send,
{
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        self.dispatch(request)
    }
}

impl<C, S> Service<Request<Bytes>> for HookTransport<C, S>
where
    C: HttpClient + Clone + 'static,
    S: Default + Send + 'static,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.dispatch(request).await })
    }
}

impl<C: Clone, S> Clone for HookTransport<C, S> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<C: fmt::Debug, S> fmt::Debug for HookTransport<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTransport")
            .field("base", &self.base)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Builder for [`HookTransport`].
///
/// Hook registration only appends: `.before(a).before(b)` and
/// `.before_all([a, b])` produce the same chain.
pub struct HookTransportBuilder<C = HyperClient, S = ()> {
    base: Base<C>,
    hooks: Hooks<S>,
}

/// Base executor slot. The default one is only built by `build()`.
enum Base<C> {
    Default(fn() -> C),
    Given(C),
}

impl<C> Base<C> {
    fn into_client(self) -> C {
        match self {
            Self::Default(make) => make(),
            Self::Given(client) => client,
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for Base<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default(_) => f.write_str("Default"),
            Self::Given(client) => fmt::Debug::fmt(client, f),
        }
    }
}

impl<S> HookTransportBuilder<HyperClient, S> {
    /// Builder with [`HyperClient::new`] as base executor, created on
    /// [`HookTransportBuilder::build`] unless [`HookTransportBuilder::base`]
    /// replaces it.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Base::Default(HyperClient::new),
            hooks: Hooks::new(),
        }
    }
}

impl<S> Default for HookTransportBuilder<HyperClient, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> HookTransportBuilder<C, S> {
    /// Replace the base executor. Hooks registered so far are kept.
    #[must_use]
    pub fn base<C2: HttpClient>(self, base: C2) -> HookTransportBuilder<C2, S> {
        HookTransportBuilder {
            base: Base::Given(base),
            hooks: self.hooks,
        }
    }

    /// Append a before hook.
    #[must_use]
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(Request<Bytes>, &mut S) -> Request<Bytes> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.before(hook);
        self
    }

    /// Append before hooks, keeping their order.
    #[must_use]
    pub fn before_all(mut self, hooks: impl IntoIterator<Item = BeforeHook<S>>) -> Self {
        self.hooks = self.hooks.before_all(hooks);
        self
    }

    /// Append an after hook.
    #[must_use]
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request<Bytes>, &Result<Response<Bytes>>, &S) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.after(hook);
        self
    }

    /// Append after hooks, keeping their order.
    #[must_use]
    pub fn after_all(mut self, hooks: impl IntoIterator<Item = AfterHook<S>>) -> Self {
        self.hooks = self.hooks.after_all(hooks);
        self
    }

    /// Append every before and after hook of a prebuilt chain.
    #[must_use]
    pub fn hooks(mut self, hooks: Hooks<S>) -> Self {
        self.hooks = self.hooks.extend(hooks);
        self
    }

    /// Build the transport.
    #[must_use]
    pub fn build(self) -> HookTransport<C, S> {
        HookTransport {
            base: self.base.into_client(),
            hooks: self.hooks,
        }
    }
}

#[cfg(feature = "logging")]
impl<C, S: crate::Traced + 'static> HookTransportBuilder<C, S> {
    /// Append the info-level [`crate::LoggingHooks`] pair.
    ///
    /// Its before hook is placed after the before hooks registered so far, so
    /// it logs the request as they left it.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.hooks(crate::LoggingHooks::new().hooks())
    }

    /// Append the debug-level [`crate::LoggingHooks`] pair (includes headers).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.hooks(crate::LoggingHooks::debug().hooks())
    }
}

impl<C: fmt::Debug, S> fmt::Debug for HookTransportBuilder<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTransportBuilder")
            .field("base", &self.base)
            .field("hooks", &self.hooks)
            .finish()
    }
}
