//! Big-integer amounts. Never use `f64` for on-chain values: amounts travel
//! as decimal strings at the boundary and as `num_bigint::BigUint`
//! internally, avoiding any binary-float rounding on balances or fees.

use num_bigint::BigUint;
use num_traits::Num;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::EngineError;

/// `2**256 - 1`, the ceiling imposed on any amount.
fn max_u256() -> BigUint {
    (BigUint::from(1u8) << 256) - BigUint::from(1u8)
}

/// A non-negative integer amount in a chain's smallest unit (wei, satoshi,
/// sun, drops, lamports, planck, ...). Always serialised as a decimal
/// string; EVM callers that need `0x`-hex can call [`Amount::to_hex`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Amount(BigUint::from(0u8))
    }

    pub fn from_u64(value: u64) -> Self {
        Amount(BigUint::from(value))
    }

    /// Parses a big-endian byte string (as RLP stores integers) into an
    /// amount. An empty slice is zero, matching RLP's empty-string encoding.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Amount(BigUint::from_bytes_be(bytes))
    }

    pub fn to_decimal_string(&self) -> String {
        self.0.to_str_radix(10)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", self.0.to_str_radix(16))
    }

    /// Parses an unprefixed hex string (as returned by `eth_gasPrice` etc.
    /// once the `0x` prefix is stripped) into an amount.
    pub fn from_str_radix_hex(hex_digits: &str) -> Result<Self, String> {
        BigUint::from_str_radix(hex_digits, 16)
            .map(Amount)
            .map_err(|e| e.to_string())
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        Some(Amount(&self.0 + &other.0))
    }

    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        if self.0 < other.0 {
            None
        } else {
            Some(Amount(&self.0 - &other.0))
        }
    }

    /// Formats the amount as a human-readable decimal using `decimals`
    /// places, e.g. `1500000` sun with 6 decimals -> `"1.5"`.
    pub fn format_with_decimals(&self, decimals: u8) -> String {
        let digits = self.0.to_str_radix(10);
        let decimals = decimals as usize;
        if decimals == 0 {
            return digits;
        }
        let padded = if digits.len() <= decimals {
            format!("{:0>width$}", digits, width = decimals + 1)
        } else {
            digits
        };
        let split_at = padded.len() - decimals;
        let (int_part, frac_part) = padded.split_at(split_at);
        let frac_trimmed = frac_part.trim_end_matches('0');
        if frac_trimmed.is_empty() {
            int_part.to_string()
        } else {
            format!("{int_part}.{frac_trimmed}")
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::InvalidAmount { reason: format!("not a non-negative integer: {s:?}") });
        }
        let value = BigUint::from_str_radix(s, 10)
            .map_err(|e| EngineError::InvalidAmount { reason: e.to_string() })?;
        if value > max_u256() {
            return Err(EngineError::InvalidAmount { reason: "exceeds 2**256 - 1".into() });
        }
        Ok(Amount(value))
    }
}

impl TryFrom<&str> for Amount {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
