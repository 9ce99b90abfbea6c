//! Hook contracts.
//!
//! A [`Hooks`] chain carries two ordered sequences of callbacks:
//!
//! - [`BeforeHook`] - receives the outgoing request and returns the request to
//!   use from then on (the same value, a modified one, or a replacement).
//! - [`AfterHook`] - observes the final request and the outcome of the
//!   dispatch. It cannot change the outcome.
//!
//! Both kinds receive the dispatch scratch record `S`: a caller-chosen struct
//! created with [`Default`] at the start of every dispatch. Before hooks get
//! it mutably, after hooks read it. Use it to carry state between stages of the
//! same dispatch (start time, correlation id, ...) with named, typed fields.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//!
//! use roundhook_core::Hooks;
//!
//! #[derive(Default)]
//! struct Timing {
//!     started: Option<Instant>,
//! }
//!
//! let hooks = Hooks::<Timing>::new()
//!     .before(|mut request, timing| {
//!         timing.started = Some(Instant::now());
//!         request.headers_mut().insert("X-Hooked".to_string(), "1".to_string());
//!         request
//!     })
//!     .after(|_request, outcome, timing| {
//!         let _elapsed = timing.started.map(|started| started.elapsed());
//!         let _status = outcome.as_ref().map(|response| response.status());
//!     });
//!
//! assert_eq!(hooks.before_len(), 1);
//! assert_eq!(hooks.after_len(), 1);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Hook run before dispatch. Returns the request seen by the next hook and,
/// for the last hook, by the executor.
pub type BeforeHook<S = ()> = Arc<dyn Fn(Request<Bytes>, &mut S) -> Request<Bytes> + Send + Sync>;

/// Hook run after dispatch with the final request and the executor outcome.
pub type AfterHook<S = ()> =
    Arc<dyn Fn(&Request<Bytes>, &Result<Response<Bytes>>, &S) + Send + Sync>;

/// Ordered before and after hook sequences.
///
/// Registration only appends: registering `[a]` then `[b]` yields the same
/// chain as registering `[a, b]` at once.
pub struct Hooks<S = ()> {
    before: Vec<BeforeHook<S>>,
    after: Vec<AfterHook<S>>,
}

impl<S> Hooks<S> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Appends a before hook.
    #[must_use]
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(Request<Bytes>, &mut S) -> Request<Bytes> + Send + Sync + 'static,
    {
        self.before.push(Arc::new(hook));
        self
    }

    /// Appends already boxed before hooks, keeping their order.
    #[must_use]
    pub fn before_all(mut self, hooks: impl IntoIterator<Item = BeforeHook<S>>) -> Self {
        self.before.extend(hooks);
        self
    }

    /// Appends an after hook.
    #[must_use]
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request<Bytes>, &Result<Response<Bytes>>, &S) + Send + Sync + 'static,
    {
        self.after.push(Arc::new(hook));
        self
    }

    /// Appends already boxed after hooks, keeping their order.
    #[must_use]
    pub fn after_all(mut self, hooks: impl IntoIterator<Item = AfterHook<S>>) -> Self {
        self.after.extend(hooks);
        self
    }

    /// Appends every hook of `other` after the hooks already registered.
    #[must_use]
    pub fn extend(mut self, other: Self) -> Self {
        self.before.extend(other.before);
        self.after.extend(other.after);
        self
    }

    /// Number of before hooks.
    #[must_use]
    pub fn before_len(&self) -> usize {
        self.before.len()
    }

    /// Number of after hooks.
    #[must_use]
    pub fn after_len(&self) -> usize {
        self.after.len()
    }

    /// Returns `true` if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Folds the request through every before hook, in registration order.
    pub fn run_before(&self, request: Request<Bytes>, scratch: &mut S) -> Request<Bytes> {
        self.before
            .iter()
            .fold(request, |request, hook| hook(request, scratch))
    }

    /// Calls every after hook, in registration order.
    pub fn run_after(
        &self,
        request: &Request<Bytes>,
        outcome: &Result<Response<Bytes>>,
        scratch: &S,
    ) {
        for hook in &self.after {
            hook(request, outcome, scratch);
        }
    }

    /// Runs one dispatch around `execute`.
    ///
    /// A fresh scratch record is created, the request is folded through the
    /// before hooks, `execute` receives the final request, and the after hooks
    /// see that request with the outcome. The outcome is returned unchanged.
    pub async fn around<F, Fut>(
        &self,
        request: Request<Bytes>,
        execute: F,
    ) -> Result<Response<Bytes>>
    where
        S: Default,
        F: FnOnce(Request<Bytes>) -> Fut,
        Fut: Future<Output = Result<Response<Bytes>>>,
    {
        let mut scratch = S::default();
        let request = self.run_before(request, &mut scratch);

        // After hooks need the request the executor consumed
        let outcome = execute(request.clone()).await;

        self.run_after(&request, &outcome, &scratch);
        outcome
    }
}

impl<S> Default for Hooks<S> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: the hooks are shared, `S` itself need not be `Clone`.
impl<S> Clone for Hooks<S> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}

impl<S> fmt::Debug for Hooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}
