//! Concentrated-liquidity pool positions.

use serde::{Deserialize, Serialize};

use super::{BlockHeight, TimeMs};

/// Composite store key `"<pool_id>_<position_id>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub String);

impl PositionId {
    pub fn composite(pool_id: &str, position_id: &str) -> Self {
        PositionId(format!("{}_{}", pool_id, position_id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        PositionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// A tracked liquidity position. Merged positions are deleted, not flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPosition {
    pub id: PositionId,
    pub pool_id: String,
    pub height: BlockHeight,
    pub created_at: TimeMs,
    pub closed_at: Option<TimeMs>,
    pub closed_height: Option<BlockHeight>,
}

impl PoolPosition {
    pub fn open(id: PositionId, pool_id: String, height: BlockHeight, created_at: TimeMs) -> Self {
        Self {
            id,
            pool_id,
            height,
            created_at,
            closed_at: None,
            closed_height: None,
        }
    }

    pub fn close(&mut self, height: BlockHeight, at: TimeMs) {
        self.closed_at = Some(at);
        self.closed_height = Some(height);
    }

    pub fn status(&self) -> PositionStatus {
        if self.closed_height.is_some() {
            PositionStatus::Closed
        } else {
            PositionStatus::Open
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_id() {
        assert_eq!(PositionId::composite("1066", "42").as_str(), "1066_42");
    }

    #[test]
    fn test_close_transitions_status() {
        let mut position = PoolPosition::open(
            PositionId::composite("1066", "42"),
            "1066".to_string(),
            BlockHeight::new(10),
            TimeMs::new(1_000),
        );
        assert_eq!(position.status(), PositionStatus::Open);

        position.close(BlockHeight::new(20), TimeMs::new(2_000));
        assert_eq!(position.status(), PositionStatus::Closed);
        assert_eq!(position.closed_height, Some(BlockHeight::new(20)));
        assert_eq!(position.closed_at, Some(TimeMs::new(2_000)));
    }
}
