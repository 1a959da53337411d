#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::ReconcileError;

mod config;
pub use config::EngineConfig;

mod plan;
pub use plan::{ReconciliationPlan, TickKind, TickOutcome};

mod metrics;
pub use metrics::Metrics;

mod engine;
pub use engine::ReconciliationEngine;

mod driver;
pub use driver::{DriverConfig, DriverSummary, PollDriver, TickContext};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
