//! Token amounts
//!
//! Amounts are held as integer base units to avoid floating-point precision
//! issues. With 18 decimals, 1 whole token = 10^18 base units, so the full
//! HE2 supply of 1,000,000 tokens is 10^24 base units, well inside `u128`.

use thiserror::Error;

/// A non-negative quantity of base units
pub type Amount = u128;

/// Errors from converting between whole-token text and base units
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("invalid amount format: {0}")]
    InvalidFormat(String),
    #[error("too many decimal places: token supports at most {max}")]
    TooManyDecimals { max: u8 },
    #[error("amount does not fit in 128 bits")]
    Overflow,
}

/// Number of base units in one whole token (`10^decimals`)
pub fn unit_scale(decimals: u8) -> Option<Amount> {
    10u128.checked_pow(u32::from(decimals))
}

/// Convert a whole-token count into base units
pub fn to_base_units(whole: u128, decimals: u8) -> Option<Amount> {
    unit_scale(decimals)?.checked_mul(whole)
}

/// Format base units as a decimal string.
/// Example with 18 decimals: 10^18 -> "1", 15 * 10^17 -> "1.5"
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let Some(scale) = unit_scale(decimals) else {
        return amount.to_string();
    };
    let whole = amount / scale;
    let fraction = amount % scale;

    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Parse a decimal string into base units.
/// Example with 18 decimals: "10" -> 10 * 10^18, "0.5" -> 5 * 10^17
pub fn parse_units(input: &str, decimals: u8) -> Result<Amount, AmountError> {
    let input = input.trim();
    let invalid = || AmountError::InvalidFormat(input.to_string());

    let (whole_str, fraction_str) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole_str.is_empty() && fraction_str.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole_str) || !all_digits(fraction_str) {
        return Err(invalid());
    }
    if fraction_str.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals { max: decimals });
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| AmountError::Overflow)?
    };

    let fraction: u128 = if fraction_str.is_empty() {
        0
    } else {
        // Right-pad to the full decimal width: "5" with 18 decimals is 5 * 10^17
        let padding =
            unit_scale(decimals - fraction_str.len() as u8).ok_or(AmountError::Overflow)?;
        let digits: u128 = fraction_str.parse().map_err(|_| AmountError::Overflow)?;
        digits.checked_mul(padding).ok_or(AmountError::Overflow)?
    };

    to_base_units(whole, decimals)
        .and_then(|base| base.checked_add(fraction))
        .ok_or(AmountError::Overflow)
}

/// Serde helpers that write amounts as decimal strings.
///
/// JSON numbers above 2^64 do not survive `serde_json::Value` or most
/// non-Rust JSON consumers, so amounts go on the wire as strings. Plain
/// integers are still accepted when reading.
///
/// Use with `#[serde(with = "crate::token::amount::decimal_string")]`, or the
/// `map` / `nested_map` submodules for amount-valued maps.
pub mod decimal_string {
    use super::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;
    use std::fmt;

    struct Repr(Amount);

    impl Serialize for Repr {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(&self.0)
        }
    }

    struct ReprVisitor;

    impl<'de> Visitor<'de> for ReprVisitor {
        type Value = Repr;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer amount")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Repr, E> {
            v.parse()
                .map(Repr)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Repr, E> {
            Ok(Repr(Amount::from(v)))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Repr, E> {
            Ok(Repr(v))
        }
    }

    impl<'de> Deserialize<'de> for Repr {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ReprVisitor)
        }
    }

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        Repr(*amount).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        Repr::deserialize(deserializer).map(|r| r.0)
    }

    /// `BTreeMap<K, Amount>` with string amounts
    pub mod map {
        use super::{Amount, BTreeMap, Deserialize, Deserializer, Repr, Serializer};

        pub fn serialize<K, S>(
            map: &BTreeMap<K, Amount>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            K: serde::Serialize,
            S: Serializer,
        {
            serializer.collect_map(map.iter().map(|(k, v)| (k, Repr(*v))))
        }

        pub fn deserialize<'de, K, D>(deserializer: D) -> Result<BTreeMap<K, Amount>, D::Error>
        where
            K: Deserialize<'de> + Ord,
            D: Deserializer<'de>,
        {
            let raw = BTreeMap::<K, Repr>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(|(k, v)| (k, v.0)).collect())
        }
    }

    /// `BTreeMap<K, BTreeMap<K, Amount>>` with string amounts
    pub mod nested_map {
        use super::{Amount, BTreeMap, Deserialize, Deserializer, Repr, Serialize, Serializer};

        type Nested<K> = BTreeMap<K, BTreeMap<K, Amount>>;

        struct Inner<'a, K>(&'a BTreeMap<K, Amount>);

        impl<K: Serialize> Serialize for Inner<'_, K> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                super::map::serialize(self.0, serializer)
            }
        }

        pub fn serialize<K, S>(map: &Nested<K>, serializer: S) -> Result<S::Ok, S::Error>
        where
            K: Serialize,
            S: Serializer,
        {
            serializer.collect_map(map.iter().map(|(k, inner)| (k, Inner(inner))))
        }

        pub fn deserialize<'de, K, D>(deserializer: D) -> Result<Nested<K>, D::Error>
        where
            K: Deserialize<'de> + Ord,
            D: Deserializer<'de>,
        {
            let raw = BTreeMap::<K, BTreeMap<K, Repr>>::deserialize(deserializer)?;
            Ok(raw
                .into_iter()
                .map(|(k, inner)| (k, inner.into_iter().map(|(s, v)| (s, v.0)).collect()))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(10, 18), Some(10 * E18));
        assert_eq!(to_base_units(1_000_000, 18), Some(1_000_000 * E18));
        assert_eq!(to_base_units(7, 0), Some(7));
        assert_eq!(to_base_units(u128::MAX, 18), None);
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(0, 18), "0");
        assert_eq!(format_units(96 * E18, 18), "96");
        assert_eq!(format_units(15 * E18 / 10, 18), "1.5");
        assert_eq!(format_units(1, 18), "0.000000000000000001");
        assert_eq!(format_units(1234, 2), "12.34");
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("10", 18), Ok(10 * E18));
        assert_eq!(parse_units("0.5", 18), Ok(E18 / 2));
        assert_eq!(parse_units(".25", 2), Ok(25));
        assert_eq!(parse_units("12.", 2), Ok(1200));
        assert_eq!(parse_units(" 1.000000000000000001 ", 18), Ok(E18 + 1));
    }

    #[test]
    fn test_parse_units_errors() {
        assert!(matches!(parse_units("", 18), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_units(".", 18), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_units("-1", 18), Err(AmountError::InvalidFormat(_))));
        assert!(matches!(parse_units("1.2.3", 18), Err(AmountError::InvalidFormat(_))));
        assert_eq!(
            parse_units("1.234", 2),
            Err(AmountError::TooManyDecimals { max: 2 })
        );
        assert_eq!(
            parse_units("340282366920938463463374607431768211456", 0),
            Err(AmountError::Overflow)
        );
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Wire {
        #[serde(with = "decimal_string")]
        amount: Amount,
        #[serde(with = "decimal_string::map")]
        balances: std::collections::BTreeMap<String, Amount>,
    }

    #[test]
    fn test_decimal_string_survives_json_value() {
        let wire = Wire {
            amount: 96 * E18,
            balances: [("owner".to_string(), 1_000_000 * E18)].into_iter().collect(),
        };

        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["amount"], serde_json::json!("96000000000000000000"));
        assert_eq!(
            value["balances"]["owner"],
            serde_json::json!("1000000000000000000000000")
        );

        let back: Wire = serde_json::from_value(value).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn test_decimal_string_accepts_plain_integers() {
        let wire: Wire =
            serde_json::from_str(r#"{"amount": 7, "balances": {"a": "5"}}"#).unwrap();
        assert_eq!(wire.amount, 7);
        assert_eq!(wire.balances["a"], 5);

        let bad = serde_json::from_str::<Wire>(r#"{"amount": "-1", "balances": {}}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_format_parse_agree() {
        let amount = 8 * E18 + 125 * E18 / 1000;
        assert_eq!(parse_units(&format_units(amount, 18), 18), Ok(amount));
    }
}
