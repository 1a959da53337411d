//! Contract ABI descriptions.

use crate::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SHAPE: &str = "abi";

/// A contract ABI: the list of its members.
pub type Abi = Vec<AbiMember>;

/// An input parameter of an ABI member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AbiInput {
    /// The parameter name, empty for unnamed parameters.
    #[serde(default)]
    pub name: String,
    /// The canonical parameter type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the parameter is an indexed event topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    /// The source-level type emitted by newer compilers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    /// Tuple components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<AbiInput>>,
}

/// An output parameter of an ABI member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AbiOutput {
    /// The parameter name, empty for unnamed parameters.
    #[serde(default)]
    pub name: String,
    /// The canonical parameter type.
    #[serde(rename = "type")]
    pub ty: String,
    /// The source-level type emitted by newer compilers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    /// Tuple components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<AbiOutput>>,
}

/// One member of a contract interface: a function, event, constructor, fallback or
/// receive entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AbiMember {
    /// Legacy marker for view functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    /// Input parameters.
    #[serde(default)]
    pub inputs: Vec<AbiInput>,
    /// The member name, empty for constructors and fallbacks.
    #[serde(default)]
    pub name: String,
    /// Output parameters.
    #[serde(default)]
    pub outputs: Vec<AbiOutput>,
    /// The member kind (`function`, `event`, ...).
    #[serde(rename = "type")]
    pub ty: String,
    /// Legacy marker for payable functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    /// The function's state mutability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// Whether the event is anonymous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<bool>,
}

impl AbiMember {
    fn validate(&self, index: usize) -> Result<(), SchemaError> {
        if self.ty.is_empty() {
            return Err(SchemaError::invalid(SHAPE, format!("member {index} has an empty type")));
        }
        if matches!(&self.state_mutability, Some(m) if m.is_empty()) {
            return Err(SchemaError::invalid(
                SHAPE,
                format!("member {index} has an empty stateMutability"),
            ));
        }
        if let Some(input) = self.inputs.iter().find(|input| input.ty.is_empty()) {
            return Err(SchemaError::invalid(
                SHAPE,
                format!("input `{}` of member {index} has an empty type", input.name),
            ));
        }
        if let Some(output) = self.outputs.iter().find(|output| output.ty.is_empty()) {
            return Err(SchemaError::invalid(
                SHAPE,
                format!("output `{}` of member {index} has an empty type", output.name),
            ));
        }
        Ok(())
    }
}

/// Decodes a contract ABI. Unknown keys and empty type names are rejected.
pub fn decode_abi(value: &Value) -> Result<Abi, SchemaError> {
    if value.is_null() {
        return Err(SchemaError::Null { shape: SHAPE });
    }
    let abi = Abi::deserialize(value).map_err(|err| SchemaError::malformed(SHAPE, err))?;
    for (index, member) in abi.iter().enumerate() {
        member.validate(index)?;
    }
    Ok(abi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_erc20_fragment() {
        let abi = decode_abi(&json!([
            {
                "constant": true,
                "inputs": [{ "name": "owner", "type": "address" }],
                "name": "balanceOf",
                "outputs": [{ "name": "", "type": "uint256" }],
                "payable": false,
                "stateMutability": "view",
                "type": "function"
            },
            {
                "anonymous": false,
                "inputs": [
                    { "indexed": true, "name": "from", "type": "address" },
                    { "indexed": true, "name": "to", "type": "address" },
                    { "indexed": false, "name": "value", "type": "uint256" }
                ],
                "name": "Transfer",
                "type": "event"
            },
            { "payable": true, "stateMutability": "payable", "type": "fallback" }
        ]))
        .unwrap();

        assert_eq!(abi.len(), 3);
        assert_eq!(abi[0].name, "balanceOf");
        assert_eq!(abi[0].outputs[0].name, "");
        assert_eq!(abi[1].inputs[0].indexed, Some(true));
        assert!(abi[1].outputs.is_empty());
        assert_eq!(abi[2].name, "");
    }

    #[test]
    fn test_decode_tuple_components() {
        let abi = decode_abi(&json!([{
            "inputs": [{
                "components": [{ "internalType": "uint256", "name": "a", "type": "uint256" }],
                "internalType": "struct S",
                "name": "s",
                "type": "tuple"
            }],
            "name": "f",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }]))
        .unwrap();

        let components = abi[0].inputs[0].components.as_ref().unwrap();
        assert_eq!(components[0].ty, "uint256");
    }

    #[test]
    fn test_decode_abi_rejects_unknown_keys() {
        let err = decode_abi(&json!([{ "type": "function", "name": "f", "gas": 10 }])).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed { shape: "abi", .. }));
    }

    #[test]
    fn test_decode_abi_rejects_empty_types() {
        assert!(decode_abi(&json!([{ "type": "" }])).is_err());
        assert!(decode_abi(&json!([{ "type": "function", "inputs": [{ "name": "x", "type": "" }] }])).is_err());
        assert!(decode_abi(&json!([{ "type": "function", "stateMutability": "" }])).is_err());
        assert!(decode_abi(&json!({ "type": "function" })).is_err());
    }
}
