//! Prometheus metrics flags.

use crate::{CliResult, init_prometheus_server};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Prometheus exporter arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(long = "metrics.enabled", env = "METRICS_ENABLED", default_value_t = false)]
    pub enabled: bool,
    /// The address to serve metrics on.
    #[arg(long = "metrics.addr", env = "METRICS_ADDR", default_value = "0.0.0.0")]
    pub addr: IpAddr,
    /// The port to serve metrics on. `0` picks a free port.
    #[arg(long = "metrics.port", env = "METRICS_PORT", default_value_t = 9090)]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the exporter if enabled, returning its address.
    pub fn init_metrics(&self) -> CliResult<Option<SocketAddr>> {
        if !self.enabled {
            return Ok(None);
        }
        Ok(Some(init_prometheus_server(self.addr, self.port)?))
    }
}
