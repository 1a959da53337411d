use alloy_primitives::U64;
use alloy_rpc_client::RpcClient;
use alloy_transport::TransportResult;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::fmt::Debug;

/// Raw JSON-RPC access to a node.
///
/// Responses are returned as untrusted JSON. Nothing returned from a
/// [`NodeTransport`] should be used without going through a decoder first.
#[async_trait]
pub trait NodeTransport: Debug + Send + Sync {
    /// `eth_getBlockByNumber("latest", false)`.
    async fn latest_block(&self) -> TransportResult<Value>;

    /// `eth_getBlockByNumber(number, false)`.
    async fn block_by_number(&self, number: u64) -> TransportResult<Value>;

    /// `eth_getLogs` restricted to a single block.
    async fn logs_by_block(&self, number: u64) -> TransportResult<Value>;

    /// `net_version`.
    async fn net_version(&self) -> TransportResult<Value>;

    /// `web3_clientVersion`.
    async fn client_version(&self) -> TransportResult<Value>;
}

#[async_trait]
impl NodeTransport for RpcClient {
    async fn latest_block(&self) -> TransportResult<Value> {
        self.request("eth_getBlockByNumber", ("latest", false)).await
    }

    async fn block_by_number(&self, number: u64) -> TransportResult<Value> {
        self.request("eth_getBlockByNumber", (U64::from(number), false)).await
    }

    async fn logs_by_block(&self, number: u64) -> TransportResult<Value> {
        let filter = json!({ "fromBlock": U64::from(number), "toBlock": U64::from(number) });
        self.request("eth_getLogs", (filter,)).await
    }

    async fn net_version(&self) -> TransportResult<Value> {
        self.request_noparams("net_version").await
    }

    async fn client_version(&self) -> TransportResult<Value> {
        self.request_noparams("web3_clientVersion").await
    }
}
