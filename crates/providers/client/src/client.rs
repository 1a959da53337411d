//! The validated node client.

use crate::{ChainProvider, ClientError, NodeTransport};
use alloy_rpc_client::RpcClient;
use alloy_transport::TransportResult;
use async_trait::async_trait;
use blockstream_schema::{
    BlockRef, LogEntry, SchemaError, decode_block_ref, decode_client_version, decode_logs,
    decode_net_version, decode_optional_block_ref,
};
use serde_json::Value;
use std::{future::Future, time::Duration};
use tracing::{debug, info, trace};
use url::Url;

/// The default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const GET_BLOCK: &str = "eth_getBlockByNumber";
const GET_LOGS: &str = "eth_getLogs";
const NET_VERSION: &str = "net_version";
const CLIENT_VERSION: &str = "web3_clientVersion";

/// Identification reported by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// The `net_version` network id.
    pub network_id: u64,
    /// The `web3_clientVersion` string.
    pub client_version: String,
}

/// A node client that validates every response before returning it.
///
/// Every request is bounded by the configured timeout. Malformed responses fail
/// with [`ClientError::Schema`]; they are never retried or patched up here.
#[derive(Debug, Clone)]
pub struct ValidatedClient<T> {
    transport: T,
    timeout: Duration,
}

impl ValidatedClient<RpcClient> {
    /// Creates a client over HTTP JSON-RPC.
    pub fn new_http(url: Url, timeout: Duration) -> Self {
        Self::new(RpcClient::new_http(url), timeout)
    }
}

impl<T: NodeTransport> ValidatedClient<T> {
    /// Creates a new [`ValidatedClient`] over the given transport.
    pub const fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Returns the per-request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call<F>(&self, method: &'static str, request: F) -> Result<Value, ClientError>
    where
        F: Future<Output = TransportResult<Value>>,
    {
        trace!(target: "blockstream::client", method, "Sending request");
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                debug!(target: "blockstream::client", method, %source, "Request failed");
                let rejected = source
                    .as_error_resp()
                    .filter(|payload| !payload.is_retry_err())
                    .map(|payload| (payload.code, payload.message.to_string()));
                if let Some((code, message)) = rejected {
                    return Err(ClientError::Rejected { method, code, message });
                }
                Err(ClientError::Transport { method, source })
            }
            Err(_) => {
                debug!(target: "blockstream::client", method, timeout = ?self.timeout, "Request timed out");
                Err(ClientError::Timeout { method, timeout: self.timeout })
            }
        }
    }

    /// Queries the node's network id and client version.
    pub async fn node_info(&self) -> Result<NodeInfo, ClientError> {
        let client_version = self.call(CLIENT_VERSION, self.transport.client_version()).await?;
        let client_version = decode_client_version(&client_version)
            .map_err(|source| ClientError::Schema { method: CLIENT_VERSION, source })?;

        let network_id = self.call(NET_VERSION, self.transport.net_version()).await?;
        let network_id = decode_net_version(&network_id)
            .map_err(|source| ClientError::Schema { method: NET_VERSION, source })?;

        Ok(NodeInfo { network_id, client_version })
    }

    /// Checks that the node serves the `expected` network.
    pub async fn verify_network(&self, expected: u64) -> Result<NodeInfo, ClientError> {
        let info = self.node_info().await?;
        info!(
            target: "blockstream::client",
            network_id = info.network_id,
            client_version = %info.client_version,
            "Connected to node"
        );

        if info.network_id != expected {
            return Err(ClientError::NetworkMismatch { expected, actual: info.network_id });
        }
        Ok(info)
    }
}

#[async_trait]
impl<T: NodeTransport> ChainProvider for ValidatedClient<T> {
    async fn fetch_head(&self) -> Result<BlockRef, ClientError> {
        let value = self.call(GET_BLOCK, self.transport.latest_block()).await?;
        decode_block_ref(&value).map_err(|source| ClientError::Schema { method: GET_BLOCK, source })
    }

    async fn fetch_block_by_number(&self, number: u64) -> Result<Option<BlockRef>, ClientError> {
        let value = self.call(GET_BLOCK, self.transport.block_by_number(number)).await?;
        let block = decode_optional_block_ref(&value)
            .map_err(|source| ClientError::Schema { method: GET_BLOCK, source })?;

        match block {
            Some(block) if block.number != number => Err(ClientError::Schema {
                method: GET_BLOCK,
                source: SchemaError::Mismatch {
                    shape: "block",
                    field: "number",
                    expected: number.to_string(),
                    actual: block.number.to_string(),
                },
            }),
            block => Ok(block),
        }
    }

    async fn fetch_logs(&self, number: u64) -> Result<Vec<LogEntry>, ClientError> {
        let value = self.call(GET_LOGS, self.transport.logs_by_block(number)).await?;
        decode_logs(&value, number).map_err(|source| ClientError::Schema { method: GET_LOGS, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use alloy_transport::mock::{Asserter, MockTransport};
    use serde_json::json;

    fn mock_client() -> (Asserter, ValidatedClient<RpcClient>) {
        let asserter = Asserter::new();
        let transport = MockTransport::new(asserter.clone());
        let client = ValidatedClient::new(RpcClient::new(transport, false), DEFAULT_REQUEST_TIMEOUT);
        (asserter, client)
    }

    fn block_json(number: u64, hash: u8, parent: u8) -> Value {
        json!({
            "number": format!("{number:#x}"),
            "hash": B256::repeat_byte(hash),
            "parentHash": B256::repeat_byte(parent),
            "timestamp": "0x0"
        })
    }

    #[derive(Debug)]
    struct StalledTransport;

    #[async_trait]
    impl NodeTransport for StalledTransport {
        async fn latest_block(&self) -> TransportResult<Value> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Value::Null)
        }

        async fn block_by_number(&self, _number: u64) -> TransportResult<Value> {
            self.latest_block().await
        }

        async fn logs_by_block(&self, _number: u64) -> TransportResult<Value> {
            self.latest_block().await
        }

        async fn net_version(&self) -> TransportResult<Value> {
            self.latest_block().await
        }

        async fn client_version(&self) -> TransportResult<Value> {
            self.latest_block().await
        }
    }

    #[tokio::test]
    async fn test_fetch_head() {
        let (asserter, client) = mock_client();
        asserter.push_success(&block_json(1000, 1, 2));

        let head = client.fetch_head().await.unwrap();
        assert_eq!(head, BlockRef::new(1000, B256::repeat_byte(1), B256::repeat_byte(2)));
    }

    #[tokio::test]
    async fn test_fetch_head_rejects_null_and_malformed() {
        let (asserter, client) = mock_client();
        asserter.push_success(&Value::Null);
        asserter.push_success(&json!({ "number": "0x1", "hash": "0xzz", "parentHash": B256::ZERO }));

        assert!(matches!(client.fetch_head().await, Err(ClientError::Schema { .. })));
        assert!(matches!(client.fetch_head().await, Err(ClientError::Schema { .. })));
    }

    #[tokio::test]
    async fn test_fetch_block_by_number() {
        let (asserter, client) = mock_client();
        asserter.push_success(&block_json(41, 4, 3));
        asserter.push_success(&Value::Null);
        asserter.push_success(&block_json(5000, 4, 3));

        let block = client.fetch_block_by_number(41).await.unwrap().unwrap();
        assert_eq!(block.hash, B256::repeat_byte(4));

        // A missing block is not an error.
        assert!(client.fetch_block_by_number(42).await.unwrap().is_none());

        // A block other than the one requested is.
        let err = client.fetch_block_by_number(43).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Schema { source: SchemaError::Mismatch { field: "number", .. }, .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_logs() {
        let (asserter, client) = mock_client();
        asserter.push_success(&json!([{
            "address": format!("0x{}", "11".repeat(20)),
            "topics": [B256::repeat_byte(2)],
            "data": "0x",
            "blockNumber": "0x64",
            "blockHash": B256::repeat_byte(3),
            "transactionHash": B256::repeat_byte(4),
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false
        }]));

        let logs = client.fetch_logs(100).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].block_hash, B256::repeat_byte(3));
    }

    #[tokio::test]
    async fn test_rate_limited_is_unavailable() {
        let (asserter, client) = mock_client();
        asserter.push_failure(
            serde_json::from_value(json!({ "code": -32005, "message": "project rate limit" })).unwrap(),
        );

        let err = client.fetch_head().await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(matches!(err, ClientError::Transport { method: "eth_getBlockByNumber", .. }));
    }

    #[tokio::test]
    async fn test_error_response_is_rejected() {
        let (asserter, client) = mock_client();
        asserter.push_failure(
            serde_json::from_value(json!({
                "code": -32602,
                "message": "query returned more than 10000 results"
            }))
            .unwrap(),
        );

        let err = client.fetch_logs(100).await.unwrap_err();
        assert!(!err.is_unavailable());
        assert!(matches!(
            err,
            ClientError::Rejected { method: "eth_getLogs", code: -32602, ref message }
                if message.starts_with("query returned")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unavailable() {
        let client = ValidatedClient::new(StalledTransport, Duration::from_millis(500));

        let err = client.fetch_head().await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(matches!(err, ClientError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_verify_network() {
        let (asserter, client) = mock_client();
        asserter.push_success(&json!("Geth/v1.14.0-stable"));
        asserter.push_success(&json!("1"));
        asserter.push_success(&json!("Geth/v1.14.0-stable"));
        asserter.push_success(&json!("5"));

        let info = client.verify_network(1).await.unwrap();
        assert_eq!(info, NodeInfo { network_id: 1, client_version: "Geth/v1.14.0-stable".into() });

        let err = client.verify_network(1).await.unwrap_err();
        assert!(matches!(err, ClientError::NetworkMismatch { expected: 1, actual: 5 }));
        assert!(!err.is_unavailable());
    }
}
