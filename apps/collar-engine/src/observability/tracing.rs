//! Tracing initialization for the collar engine.
//!
//! Structured logging via `tracing-subscriber` with an `EnvFilter`.
//!
//! # Example
//!
//! ```ignore
//! use collar_engine::observability::{TracingConfig, init_tracing};
//!
//! init_tracing(&TracingConfig::default());
//! ```
//!
//! # Key Events
//!
//! - position open / settle / cancel / withdraw, at info
//! - roll offer create / cancel / execute, at info
//! - roll previews and provider store movements, at debug

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Emit compact single-line output instead of the full format.
    pub compact: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info,collar_engine=debug".to_string(),
            compact: false,
        }
    }
}

impl TracingConfig {
    /// Set the default filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Use compact single-line output.
    #[must_use]
    pub const fn compact(mut self) -> Self {
        self.compact = true;
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured default filter. Safe to
/// call once per process; subsequent calls are ignored.
pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.clone()));

    // try_init: keep silent if a subscriber is already installed (tests).
    let registry = tracing_subscriber::registry().with(filter);
    if config.compact {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init();
    } else {
        let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
    }
}
