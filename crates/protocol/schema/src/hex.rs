//! Strict hex field codecs for JSON-RPC payloads.
//!
//! Node payloads encode quantities as `0x`-prefixed hex without leading zeros and
//! fixed-size values as `0x`-prefixed hex of an exact length. These helpers accept
//! exactly that and nothing else: no decimal strings, no JSON numbers, no missing
//! prefix.

use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Deserializer, Serializer, de::Error};

fn strip_prefix(s: &str) -> Result<&str, String> {
    s.strip_prefix("0x").ok_or_else(|| format!("`{s}` is missing the 0x prefix"))
}

fn parse_quantity(s: &str) -> Result<u64, String> {
    let digits = strip_prefix(s)?;
    if digits.is_empty() {
        return Err("empty hex quantity".to_string());
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(format!("`{s}` has leading zeros"));
    }
    u64::from_str_radix(digits, 16).map_err(|err| format!("`{s}` is not a u64 quantity: {err}"))
}

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let digits = strip_prefix(s)?;
    if digits.len() != N * 2 {
        return Err(format!("expected {} hex digits, got {}", N * 2, digits.len()));
    }
    let mut out = [0u8; N];
    alloy_primitives::hex::decode_to_slice(digits, &mut out)
        .map_err(|err| format!("`{s}` is not valid hex: {err}"))?;
    Ok(out)
}

pub(crate) fn parse_hash(s: &str) -> Result<B256, String> {
    parse_fixed::<32>(s).map(B256::from)
}

/// `0x`-prefixed minimal hex `u64`.
pub(crate) mod quantity {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_quantity(&raw).map_err(D::Error::custom)
    }
}

/// `0x`-prefixed 32-byte hash.
pub(crate) mod hash {
    use super::*;

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<B256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hash(&raw).map_err(D::Error::custom)
    }
}

/// `0x`-prefixed 20-byte address.
pub(crate) mod address {
    use super::*;

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_fixed::<20>(&raw).map(Address::from).map_err(D::Error::custom)
    }
}

/// `0x`-prefixed, even-length byte string.
pub(crate) mod data {
    use super::*;

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = strip_prefix(&raw).map_err(D::Error::custom)?;
        alloy_primitives::hex::decode(digits).map(Bytes::from).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0x0", Some(0))]
    #[case("0x3e8", Some(1000))]
    #[case("0xffffffffffffffff", Some(u64::MAX))]
    #[case("0x", None)]
    #[case("0x03e8", None)]
    #[case("1000", None)]
    #[case("0xzz", None)]
    #[case("0x10000000000000000", None)]
    fn test_parse_quantity(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_quantity(input).ok(), expected);
    }

    #[test]
    fn test_parse_hash_requires_exact_length() {
        let full = format!("0x{}", "ab".repeat(32));
        assert_eq!(parse_hash(&full).unwrap(), B256::repeat_byte(0xab));

        assert!(parse_hash(&format!("0x{}", "ab".repeat(31))).is_err());
        assert!(parse_hash(&"ab".repeat(32)).is_err());
    }
}
