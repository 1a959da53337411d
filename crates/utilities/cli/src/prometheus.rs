//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr, TcpListener};
use tracing::info;

/// Starts a Prometheus metrics server on the given address and port.
///
/// Port `0` picks a free port. Returns the address the server listens on.
pub fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<SocketAddr, PrometheusError> {
    let listen_addr = if port == 0 {
        // The exporter binds its own listener, so ask the OS for a port first.
        TcpListener::bind((addr, 0))?.local_addr()?
    } else {
        SocketAddr::from((addr, port))
    };

    PrometheusBuilder::new().with_http_listener(listen_addr).install()?;

    info!(target: "blockstream::metrics", "Serving metrics at: http://{listen_addr}");
    Ok(listen_addr)
}
