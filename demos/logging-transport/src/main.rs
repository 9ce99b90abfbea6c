//! Logging Transport Demo
//!
//! Sends one GET request through a `HookTransport` whose hooks log the
//! request, its duration, and its outcome.
//!
//! ```text
//! RUST_LOG=info cargo run -p logging-transport-demo -- https://www.rust-lang.org
//! ```

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use roundhook::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "https://www.google.com";

/// Scratch record: the logging trace plus the user agent we sent.
#[derive(Debug, Default)]
struct Scratch {
    trace: RequestTrace,
    user_agent: Option<String>,
}

impl Traced for Scratch {
    fn trace(&self) -> &RequestTrace {
        &self.trace
    }

    fn trace_mut(&mut self) -> &mut RequestTrace {
        &mut self.trace
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> roundhook::Result<()> {
    init_tracing();

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    let transport = HookTransport::builder_with_scratch::<Scratch>()
        // Passing the default executor explicitly is optional
        .base(HyperClient::new())
        .before(|mut request, scratch| {
            let agent = concat!("roundhook-demo/", env!("CARGO_PKG_VERSION")).to_string();
            request
                .headers_mut()
                .insert("User-Agent".to_string(), agent.clone());
            scratch.user_agent = Some(agent);
            request
        })
        .with_logging()
        .after(|request, outcome, scratch| {
            if let (Err(_), Some(agent)) = (outcome, &scratch.user_agent) {
                tracing::warn!(url = %request.url(), %agent, "request sent with this agent failed");
            }
        })
        .build();

    let response = transport.get(&url).await?;
    println!(
        "{} {} ({} bytes)",
        response.status(),
        response.reason().unwrap_or_default(),
        response.body().len()
    );

    Ok(())
}
