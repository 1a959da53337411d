//! Node identification payloads.

use crate::SchemaError;
use serde_json::Value;

/// Decodes a `net_version` result: a decimal network id encoded as a string.
pub fn decode_net_version(value: &Value) -> Result<u64, SchemaError> {
    const SHAPE: &str = "net_version";

    let raw = match value {
        Value::String(raw) => raw,
        Value::Null => return Err(SchemaError::Null { shape: SHAPE }),
        other => {
            return Err(SchemaError::invalid(SHAPE, format!("expected a string, got {other}")));
        }
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchemaError::invalid(SHAPE, format!("`{raw}` is not a decimal network id")));
    }
    raw.parse().map_err(|err| SchemaError::invalid(SHAPE, format!("`{raw}`: {err}")))
}

/// Decodes a `web3_clientVersion` result.
pub fn decode_client_version(value: &Value) -> Result<String, SchemaError> {
    const SHAPE: &str = "web3_clientVersion";

    match value {
        Value::String(raw) if !raw.trim().is_empty() => Ok(raw.clone()),
        Value::String(_) => Err(SchemaError::invalid(SHAPE, "empty client version")),
        Value::Null => Err(SchemaError::Null { shape: SHAPE }),
        other => Err(SchemaError::invalid(SHAPE, format!("expected a string, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("1"), Some(1))]
    #[case(json!("11155111"), Some(11155111))]
    #[case(json!(1), None)]
    #[case(json!("0x1"), None)]
    #[case(json!(""), None)]
    #[case(json!(null), None)]
    fn test_decode_net_version(#[case] value: Value, #[case] expected: Option<u64>) {
        assert_eq!(decode_net_version(&value).ok(), expected);
    }

    #[test]
    fn test_decode_client_version() {
        assert_eq!(decode_client_version(&json!("Geth/v1.14.0")).unwrap(), "Geth/v1.14.0");
        assert!(decode_client_version(&json!(" ")).is_err());
        assert!(decode_client_version(&json!({})).is_err());
    }
}
