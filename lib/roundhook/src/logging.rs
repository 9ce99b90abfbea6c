//! Request/response logging hooks.
//!
//! [`LoggingHooks`] produces a before hook that stamps the dispatch with an id
//! and a start time, and an after hook that logs the outcome with the elapsed
//! time. Both use `tracing`.
//!
//! The stamp lives in a [`RequestTrace`] inside the dispatch scratch record,
//! reachable through [`Traced`]. Use [`RequestTrace`] directly as the scratch
//! type, or embed it in your own:
//!
//! ```ignore
//! use roundhook::{HookTransport, RequestTrace, Traced};
//!
//! #[derive(Default)]
//! struct Scratch {
//!     trace: RequestTrace,
//!     tenant: Option<String>,
//! }
//!
//! impl Traced for Scratch {
//!     fn trace(&self) -> &RequestTrace {
//!         &self.trace
//!     }
//!     fn trace_mut(&mut self) -> &mut RequestTrace {
//!         &mut self.trace
//!     }
//! }
//!
//! let transport = HookTransport::builder_with_scratch::<Scratch>()
//!     .with_logging()
//!     .build();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::{Hooks, Request, Response, Result};

/// Per-dispatch logging state, written by the before hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTrace {
    /// Dispatch id, unique per [`LoggingHooks`] and starting at 1. `0` until
    /// the before hook ran.
    pub id: u64,
    /// When the before hook ran.
    pub started: Option<Instant>,
}

impl RequestTrace {
    /// Time since the before hook ran.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|started| started.elapsed())
    }
}

/// Scratch records carrying a [`RequestTrace`].
pub trait Traced {
    /// The trace.
    fn trace(&self) -> &RequestTrace;

    /// Mutable access to the trace.
    fn trace_mut(&mut self) -> &mut RequestTrace;
}

impl Traced for RequestTrace {
    fn trace(&self) -> &RequestTrace {
        self
    }

    fn trace_mut(&mut self) -> &mut RequestTrace {
        self
    }
}

/// Log level for the logging hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level, including request headers.
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

/// Factory for the logging hook pair.
///
/// Clones share the id sequence.
#[derive(Debug, Clone, Default)]
pub struct LoggingHooks {
    level: LogLevel,
    last_id: Arc<AtomicU64>,
}

impl LoggingHooks {
    /// Info-level logging hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debug-level logging hooks.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
            ..Self::default()
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// The before/after hook pair.
    #[must_use]
    pub fn hooks<S: Traced + 'static>(&self) -> Hooks<S> {
        let level = self.level;
        let last_id = Arc::clone(&self.last_id);

        Hooks::new()
            .before(move |request: Request<Bytes>, scratch: &mut S| {
                let trace = scratch.trace_mut();
                trace.id = last_id.fetch_add(1, Ordering::Relaxed) + 1;
                trace.started = Some(Instant::now());
                log_sent(level, trace.id, &request);
                request
            })
            .after(move |request, outcome, scratch: &S| {
                log_completed(scratch.trace(), request, outcome);
            })
    }
}

fn log_sent(level: LogLevel, id: u64, request: &Request<Bytes>) {
    let method = request.method();
    let url = request.url();
    match level {
        LogLevel::Debug => {
            debug!(id, %method, %url, headers = ?request.headers(), "-> sending request");
        }
        LogLevel::Info => info!(id, %method, %url, "-> sending request"),
    }
}

fn log_completed(
    trace: &RequestTrace,
    request: &Request<Bytes>,
    outcome: &Result<Response<Bytes>>,
) {
    let method = request.method();
    let url = request.url();
    let id = trace.id;
    // Saturating conversion, a missing start time logs as 0
    let elapsed_ms = trace
        .elapsed()
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));

    match outcome {
        Ok(response) if response.is_success() => {
            let status = response.status();
            info!(id, %method, %url, status, elapsed_ms, "<- request completed");
        }
        Ok(response) => {
            warn!(
                id,
                %method,
                %url,
                status = response.status(),
                reason = response.reason().unwrap_or_default(),
                elapsed_ms,
                "<- request completed with HTTP error"
            );
        }
        Err(err) => warn!(id, %method, %url, error = %err, elapsed_ms, "<- request failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{Error, Method};

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("https://api.example.com/logged").expect("valid URL");
        Request::builder(Method::Get, url).build()
    }

    #[test]
    fn levels() {
        check!(LoggingHooks::new().level() == LogLevel::Info);
        check!(LoggingHooks::debug().level() == LogLevel::Debug);
    }

    #[test]
    fn before_hook_stamps_trace() {
        let hooks = LoggingHooks::new().hooks::<RequestTrace>();

        let mut first = RequestTrace::default();
        let _ = hooks.run_before(request(), &mut first);
        let mut second = RequestTrace::default();
        let _ = hooks.run_before(request(), &mut second);

        check!(first.id == 1);
        check!(second.id == 2);
        let_assert!(Some(started) = first.started);
        check!(second.started >= Some(started));
    }

    #[test]
    fn clones_share_id_sequence() {
        let logging = LoggingHooks::debug();
        let a = logging.hooks::<RequestTrace>();
        let b = logging.clone().hooks::<RequestTrace>();

        let mut trace = RequestTrace::default();
        let _ = a.run_before(request(), &mut trace);
        let _ = b.run_before(request(), &mut trace);
        check!(trace.id == 2);
    }

    #[test]
    fn request_passes_through_untouched() {
        let hooks = LoggingHooks::new().hooks::<RequestTrace>();
        let original = request();

        let seen = hooks.run_before(original.clone(), &mut RequestTrace::default());
        check!(seen == original);
    }

    #[test]
    fn after_hook_handles_every_outcome() {
        #[derive(Default)]
        struct Scratch {
            trace: RequestTrace,
        }

        impl Traced for Scratch {
            fn trace(&self) -> &RequestTrace {
                &self.trace
            }

            fn trace_mut(&mut self) -> &mut RequestTrace {
                &mut self.trace
            }
        }

        let hooks = LoggingHooks::new().hooks::<Scratch>();
        let stamped = {
            let mut scratch = Scratch::default();
            let _ = hooks.run_before(request(), &mut scratch);
            scratch
        };
        check!(stamped.trace.id == 1);

        let ok = Ok(Response::new(200, HashMap::new(), Bytes::new()));
        let bad_gateway = Ok(Response::new(502, HashMap::new(), Bytes::new()));
        hooks.run_after(&request(), &ok, &stamped);
        hooks.run_after(&request(), &bad_gateway, &stamped);
        hooks.run_after(&request(), &Err(Error::Timeout), &stamped);
        // After hook without a prior before hook
        hooks.run_after(&request(), &Err(Error::Timeout), &Scratch::default());
    }

    #[test]
    fn unstamped_trace_has_no_elapsed() {
        check!(RequestTrace::default().elapsed().is_none());
    }
}
