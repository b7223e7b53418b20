//! Structured logging setup for embedders of this crate.
//!
//! StudyFrog's core is a pure library with no binary entry point of its
//! own (§2), so nothing here calls [`init_tracing`] automatically. An
//! embedding application (the desktop shell, a test harness, a future
//! CLI) calls it once at startup to get a `tracing_subscriber::fmt` +
//! `EnvFilter` setup.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Installs a global `tracing` subscriber, once. `filter` overrides the
/// default (`"studyfrog=info"`) and otherwise behaves like
/// `RUST_LOG` — subsequent calls are no-ops.
pub fn init_tracing(filter: Option<&str>) {
    INIT.call_once(|| {
        let env_filter = filter
            .map(|value| value.to_string())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "studyfrog=info".to_string());

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(env_filter))
            .with(fmt::layer());

        if subscriber.try_init().is_err() {
            tracing::debug!("tracing subscriber already initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_does_not_panic_when_called_twice() {
        init_tracing(Some("studyfrog=debug"));
        init_tracing(Some("studyfrog=trace"));
    }
}
