//! Hook chain as a tower layer.

use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::client::ServiceFuture;
use crate::{Error, Hooks, Request, Response, Result};

/// Layer running a [`Hooks`] chain around the wrapped service.
///
/// # Example
///
/// ```ignore
/// use roundhook::Hooks;
/// use roundhook::middleware::HookLayer;
/// use tower::ServiceBuilder;
///
/// let hooks = Hooks::<()>::new().after(|request, outcome, ()| {
///     tracing::info!(url = %request.url(), ok = outcome.is_ok(), "exchange");
/// });
/// let service = ServiceBuilder::new()
///     .layer(HookLayer::new(hooks))
///     .service(client);
/// ```
#[derive(Debug)]
pub struct HookLayer<S = ()> {
    hooks: Hooks<S>,
}

impl<S> HookLayer<S> {
    /// Create a layer from a hook chain.
    #[must_use]
    pub fn new(hooks: Hooks<S>) -> Self {
        Self { hooks }
    }
}

impl<S> Clone for HookLayer<S> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

impl<Svc, S> Layer<Svc> for HookLayer<S> {
    type Service = HookService<Svc, S>;

    fn layer(&self, inner: Svc) -> Self::Service {
        HookService {
            inner,
            hooks: self.hooks.clone(),
        }
    }
}

/// Service produced by [`HookLayer`].
#[derive(Debug)]
pub struct HookService<Svc, S = ()> {
    inner: Svc,
    hooks: Hooks<S>,
}

impl<Svc: Clone, S> Clone for HookService<Svc, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

impl<Svc, S> Service<Request<Bytes>> for HookService<Svc, S>
where
    Svc: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
        + Clone
        + Send
        + 'static,
    Svc::Future: Send,
    S: Default + Send + 'static,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let mut inner = self.inner.clone();
        let hooks = self.hooks.clone();

        Box::pin(async move { hooks.around(request, |request| inner.call(request)).await })
    }
}
