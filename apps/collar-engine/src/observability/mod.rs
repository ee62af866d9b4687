//! Observability
//!
//! Structured logging setup for the engine.

mod tracing;

pub use tracing::{TracingConfig, init_tracing};
