use alloy_transport::TransportError;
use blockstream_schema::SchemaError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by the [`ValidatedClient`](crate::ValidatedClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The node answered, but the response failed validation.
    #[error("invalid {method} response: {source}")]
    Schema {
        /// The JSON-RPC method.
        method: &'static str,
        /// The validation failure.
        #[source]
        source: SchemaError,
    },

    /// The request failed at the transport level.
    #[error("{method} request failed: {source}")]
    Transport {
        /// The JSON-RPC method.
        method: &'static str,
        /// The transport failure.
        #[source]
        source: TransportError,
    },

    /// The node answered with a JSON-RPC error that retrying will not clear.
    #[error("{method} rejected by the node: {message} (code {code})")]
    Rejected {
        /// The JSON-RPC method.
        method: &'static str,
        /// The JSON-RPC error code.
        code: i64,
        /// The JSON-RPC error message.
        message: String,
    },

    /// The request did not complete in time.
    #[error("{method} request timed out after {timeout:?}")]
    Timeout {
        /// The JSON-RPC method.
        method: &'static str,
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The node serves a different network than the one configured.
    #[error("node reports network id {actual}, expected {expected}")]
    NetworkMismatch {
        /// The configured network id.
        expected: u64,
        /// The network id reported by the node.
        actual: u64,
    },
}

impl ClientError {
    /// Returns true if the node could not be reached or did not answer in time.
    ///
    /// Such failures are transient: a later request may succeed. Rate-limit
    /// errors reported in a JSON-RPC error response count as unavailable too.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}
