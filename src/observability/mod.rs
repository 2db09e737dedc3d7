//! Observability for fireservice
//!
//! Logging goes through `tracing`. Library code only emits events; the
//! binary decides where they go by calling `init_logging`.
//!
//! # Principles
//!
//! 1. Observability is read-only and never changes call outcomes
//! 2. Every log line carries an `event` field from `Event`
//! 3. Each `call()` runs inside a `service_call` span with a call id

mod events;

pub use events::Event;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "fireservice=info";

/// Installs a JSON subscriber writing to stderr.
///
/// Stdout is left for command responses. Returns `false` when a global
/// subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    let fallback = if verbose { "fireservice=debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .try_init()
        .is_ok()
}

