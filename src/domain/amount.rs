//! Arbitrary-precision integer amounts backed by num-bigint.
//!
//! Provides the chain-native coin parser (`"12345uatom"` -> magnitude + denom) and
//! a signed `Amount` type used for running balances.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::Denom;

/// Signed integer amount of unbounded width.
///
/// Serializes as a decimal string so values wider than 64 bits survive JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigInt);

impl Amount {
    /// The additive identity (0).
    pub fn zero() -> Self {
        Amount(BigInt::zero())
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Format as a plain base-10 string (leading `-` when negative).
    pub fn to_canonical_string(&self) -> String {
        self.0.to_str_radix(10)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = num_bigint::ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::from_str(s).map(Amount)
    }
}

impl From<BigInt> for Amount {
    fn from(value: BigInt) -> Self {
        Amount(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(BigInt::from(value))
    }
}

impl std::ops::Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl std::ops::Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Amount::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

/// A parsed chain-native coin: unsigned magnitude plus denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub amount: Amount,
    pub denom: Denom,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("amount {0:?} has no leading digits")]
    MissingMagnitude(String),
    #[error("amount {0:?} has no denomination suffix")]
    MissingDenom(String),
}

/// Split `"<digits><suffix>"` into magnitude and denomination.
///
/// The suffix is everything after the leading ASCII digit run, so
/// `"1uosmo,2uatom"` yields the denom `"uosmo,2uatom"`.
pub fn parse_coin(raw: &str) -> Result<Coin, AmountParseError> {
    let split = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(raw.len());

    let (digits, suffix) = raw.split_at(split);
    if digits.is_empty() {
        return Err(AmountParseError::MissingMagnitude(raw.to_string()));
    }
    if suffix.is_empty() {
        return Err(AmountParseError::MissingDenom(raw.to_string()));
    }

    let magnitude = BigInt::from_str(digits)
        .map_err(|_| AmountParseError::MissingMagnitude(raw.to_string()))?;

    Ok(Coin {
        amount: Amount(magnitude),
        denom: Denom::new(suffix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_coin() {
        let coin = parse_coin("12345uosmo").unwrap();
        assert_eq!(coin.amount, Amount::from(12345));
        assert_eq!(coin.denom, Denom::new("uosmo"));
    }

    #[test]
    fn test_parse_without_digits_fails() {
        assert_eq!(
            parse_coin("osmo"),
            Err(AmountParseError::MissingMagnitude("osmo".to_string()))
        );
        assert!(parse_coin("").is_err());
    }

    #[test]
    fn test_parse_without_denom_fails() {
        assert_eq!(
            parse_coin("100"),
            Err(AmountParseError::MissingDenom("100".to_string()))
        );
    }

    #[test]
    fn test_parse_magnitude_wider_than_u64() {
        let coin = parse_coin("340282366920938463463374607431768211456ibc/27394FB092").unwrap();
        assert_eq!(
            coin.amount.to_canonical_string(),
            "340282366920938463463374607431768211456"
        );
        assert_eq!(coin.denom.as_str(), "ibc/27394FB092");
    }

    #[test]
    fn test_parse_keeps_trailing_coins_in_denom() {
        let coin = parse_coin("1uosmo,2uatom").unwrap();
        assert_eq!(coin.amount, Amount::from(1));
        assert_eq!(coin.denom.as_str(), "uosmo,2uatom");
    }

    #[test]
    fn test_amount_arithmetic_goes_negative() {
        let a = Amount::from(5);
        let b = Amount::from(8);
        let diff = &a - &b;
        assert!(diff.is_negative());
        assert_eq!(diff.to_canonical_string(), "-3");
        assert_eq!(&diff + &b, a);
    }

    #[test]
    fn test_amount_json_is_string() {
        let amount = Amount::from_str("18446744073709551616").unwrap();
        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(json, serde_json::json!("18446744073709551616"));
        let back: Amount = serde_json::from_value(json).unwrap();
        assert_eq!(back, amount);
    }
}
