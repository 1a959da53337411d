#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod backtrace;

mod error;
pub use error::{CliError, CliResult, PrometheusError};

mod subscriber;
pub use subscriber::{init_tracing_subscriber, verbosity_level};

mod prometheus;
pub use prometheus::init_prometheus_server;

mod styles;
pub use styles::cli_styles;

pub mod log;
pub use log::LogArgs;

pub mod metrics_args;
pub use metrics_args::MetricsArgs;
