use clap::Parser;
use std::time::Duration;
use url::Url;

/// Node connection arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct NodeArgs {
    /// URL of the node's JSON-RPC API.
    #[arg(long = "node-url", env = "SRC_NODE_URL")]
    pub node_url: Url,
    /// The `net_version` the node must report.
    #[arg(long = "network-id", env = "NETWORK_ID", value_parser = clap::value_parser!(u64).range(1..))]
    pub network_id: u64,
    /// Timeout for every node, store and queue call, in milliseconds.
    #[arg(
        long = "request-timeout-ms",
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_ms: u64,
}

impl NodeArgs {
    /// Returns the per-call timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
