//! Domain primitives: TimeMs, BlockHeight, Address, ChainId, Denom.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Get the underlying milliseconds value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<DateTime<Utc>> for TimeMs {
    fn from(value: DateTime<Utc>) -> Self {
        TimeMs(value.timestamp_millis())
    }
}

/// Block height as reported by the block header.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(pub i64);

impl BlockHeight {
    pub fn new(height: i64) -> Self {
        BlockHeight(height)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bech32 account address (e.g. "osmo1...").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chain identifier from the block header (e.g. "osmosis-1").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        ChainId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Denomination code suffixed to chain-native amounts (e.g. "uosmo").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denom(pub String);

impl Denom {
    pub fn new(denom: impl Into<String>) -> Self {
        Denom(denom.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Denom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncate a block time to its UTC calendar day.
pub fn utc_day(time: &DateTime<Utc>) -> NaiveDate {
    time.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_address_display() {
        let addr = Address::new("osmo1abc");
        assert_eq!(addr.to_string(), "osmo1abc");
    }

    #[test]
    fn test_address_serializes_as_plain_string() {
        let json = serde_json::to_string(&Address::new("osmo1abc")).unwrap();
        assert_eq!(json, "\"osmo1abc\"");
    }

    #[test]
    fn test_timems_from_datetime() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let ms = TimeMs::from(time);
        assert_eq!(ms.as_i64(), time.timestamp_millis());
    }

    #[test]
    fn test_utc_day_truncates_time_of_day() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        assert_eq!(utc_day(&time), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_height_ordering() {
        assert!(BlockHeight::new(10) < BlockHeight::new(11));
    }
}
