//! Account identifiers
//!
//! An [`Address`] is an opaque 20-byte value. Its text form is `0x`
//! followed by 40 lowercase hex characters, which is also how it
//! serializes, so addresses work as JSON map keys.

use crate::crypto::{hash160, HASH160_LEN};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected {expected} hex characters, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// A fixed-size account identifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; HASH160_LEN]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; HASH160_LEN]);

    /// Wrap raw address bytes
    pub const fn from_bytes(bytes: [u8; HASH160_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive an address by hashing arbitrary data
    pub fn derive(data: &[u8]) -> Self {
        Self(hash160(data))
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; HASH160_LEN] {
        &self.0
    }

    /// Lowercase hex form with a `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != HASH160_LEN * 2 {
            return Err(AddressError::InvalidLength {
                expected: HASH160_LEN * 2,
                got: digits.len(),
            });
        }

        let mut bytes = [0u8; HASH160_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;

        Ok(Self(bytes))
    }
}

impl From<[u8; HASH160_LEN]> for Address {
    fn from(bytes: [u8; HASH160_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let address = Address::derive(b"owner");
        let text = address.to_string();

        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_parse_without_prefix_and_uppercase() {
        let address = Address::derive(b"holder");
        let upper = hex::encode_upper(address.as_bytes());

        assert_eq!(upper.parse::<Address>().unwrap(), address);
        assert_eq!(format!("0X{}", upper).parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(AddressError::InvalidLength {
                expected: 40,
                got: 4
            })
        );
        assert!(matches!(
            format!("0x{}", "zz".repeat(20)).parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_ordering_follows_bytes() {
        let low = Address::from_bytes([0x01; HASH160_LEN]);
        let high = Address::from_bytes([0x02; HASH160_LEN]);
        assert!(Address::ZERO < low);
        assert!(low < high);
    }

    #[test]
    fn test_serde_as_string() {
        let address = Address::derive(b"receiver");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
