//! Observability setup: structured logging with optional OpenTelemetry
//! trace export.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing};
