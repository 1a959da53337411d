//! Error types for CLI utilities.

use std::io;
use thiserror::Error;

/// Errors starting the Prometheus exporter.
#[derive(Debug, Error)]
pub enum PrometheusError {
    /// Failed to bind to the requested address.
    #[error("failed to bind metrics listener: {0}")]
    Bind(#[from] io::Error),
    /// Failed to build or install the recorder.
    #[error("failed to install metrics recorder: {0}")]
    Build(#[from] metrics_exporter_prometheus::BuildError),
}

/// Errors raised while setting up the telemetry stack.
#[derive(Debug, Error)]
pub enum CliError {
    /// The log filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidLogFilter(#[from] tracing_subscriber::filter::ParseError),

    /// A global tracing subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    /// The metrics exporter failed to start.
    #[error("failed to initialize metrics: {0}")]
    MetricsInitialization(#[from] PrometheusError),
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
