//! Block-explorer response envelopes.

use crate::{Abi, SchemaError, decode_abi};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const SHAPE: &str = "etherscan response";

/// The status flag of an explorer envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EtherscanStatus {
    /// The request succeeded.
    #[serde(rename = "1")]
    Ok,
    /// The request failed; `result` carries the explorer's reason.
    #[serde(rename = "0")]
    NotOk,
}

/// The `{status, message, result}` envelope returned by Etherscan-style APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EtherscanResponse {
    /// The status flag.
    pub status: EtherscanStatus,
    /// `OK`, or `NOTOK` optionally followed by a reason.
    pub message: String,
    /// The payload, or the failure reason.
    pub result: String,
}

impl EtherscanResponse {
    /// Returns true if the explorer reported success.
    pub fn is_ok(&self) -> bool {
        self.status == EtherscanStatus::Ok
    }
}

/// Errors returned while decoding an explorer payload.
#[derive(Debug, Error)]
pub enum EtherscanError {
    /// The envelope or its payload failed validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The envelope was valid but the explorer rejected the request.
    #[error("explorer rejected the request: {message}: {result}")]
    Rejected {
        /// The envelope message.
        message: String,
        /// The explorer's reason.
        result: String,
    },
}

/// Decodes an explorer envelope.
///
/// The message must be `OK` on success and start with `NOTOK` on failure.
pub fn decode_etherscan_response(value: &Value) -> Result<EtherscanResponse, SchemaError> {
    if value.is_null() {
        return Err(SchemaError::Null { shape: SHAPE });
    }
    let response = EtherscanResponse::deserialize(value)
        .map_err(|err| SchemaError::malformed(SHAPE, err))?;

    let consistent = match response.status {
        EtherscanStatus::Ok => response.message == "OK",
        EtherscanStatus::NotOk => response.message.starts_with("NOTOK"),
    };
    if !consistent {
        return Err(SchemaError::Mismatch {
            shape: SHAPE,
            field: "message",
            expected: if response.is_ok() { "OK".into() } else { "NOTOK".into() },
            actual: response.message,
        });
    }

    Ok(response)
}

/// Decodes an explorer `getabi` response whose `result` is a JSON-encoded ABI.
pub fn decode_etherscan_abi(value: &Value) -> Result<Abi, EtherscanError> {
    let response = decode_etherscan_response(value)?;
    if !response.is_ok() {
        return Err(EtherscanError::Rejected { message: response.message, result: response.result });
    }

    let abi: Value = serde_json::from_str(&response.result)
        .map_err(|err| SchemaError::malformed("abi", err))?;
    Ok(decode_abi(&abi)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_abi_envelope() {
        let abi = json!([{ "type": "function", "name": "totalSupply", "inputs": [], "outputs": [] }]);
        let envelope = json!({ "status": "1", "message": "OK", "result": abi.to_string() });

        let abi = decode_etherscan_abi(&envelope).unwrap();
        assert_eq!(abi[0].name, "totalSupply");
    }

    #[test]
    fn test_rejected_envelope() {
        let envelope = json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Contract source code not verified"
        });

        let response = decode_etherscan_response(&envelope).unwrap();
        assert!(!response.is_ok());
        assert!(matches!(
            decode_etherscan_abi(&envelope),
            Err(EtherscanError::Rejected { result, .. }) if result == "Contract source code not verified"
        ));
    }

    #[test]
    fn test_malformed_envelopes() {
        assert!(decode_etherscan_response(&json!({ "status": "2", "message": "OK", "result": "" })).is_err());
        assert!(decode_etherscan_response(&json!({ "status": 1, "message": "OK", "result": "" })).is_err());
        assert!(decode_etherscan_response(&json!({ "status": "1", "message": "NOTOK", "result": "" })).is_err());
        assert!(
            decode_etherscan_response(&json!({ "status": "1", "message": "OK", "result": "", "x": 1 }))
                .is_err()
        );

        let bad_payload = json!({ "status": "1", "message": "OK", "result": "not json" });
        assert!(matches!(decode_etherscan_abi(&bad_payload), Err(EtherscanError::Schema(_))));
    }
}
