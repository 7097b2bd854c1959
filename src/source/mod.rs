//! Event source abstraction: an ordered feed of decoded chain inputs.

use crate::domain::{BlockEvent, BlockHeader, ContractExecution, Transaction};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod jsonl;
pub mod mock;

pub use jsonl::JsonlSource;
pub use mock::MockSource;

/// One unit of work delivered to the projectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Transaction(Transaction),
    Event(BlockEvent),
    ContractExecution(ContractExecution),
}

impl FeedItem {
    pub fn block(&self) -> &BlockHeader {
        match self {
            FeedItem::Transaction(tx) => &tx.block,
            FeedItem::Event(event) => &event.block,
            FeedItem::ContractExecution(exec) => &exec.block,
        }
    }
}

/// Ordered feed of chain inputs.
///
/// Implementations must yield items in canonical chain order (block height
/// ascending, in-block index ascending). `Ok(None)` marks the end of the feed.
#[async_trait]
pub trait EventSource: Send {
    async fn next_item(&mut self) -> Result<Option<FeedItem>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feed_item_tagged_by_kind() {
        let item: FeedItem = serde_json::from_value(json!({
            "kind": "event",
            "block": {"height": 7, "chain_id": "osmosis-1", "time": "2024-01-01T00:00:00Z"},
            "event": {"type": "create_position", "attributes": []}
        }))
        .unwrap();
        match &item {
            FeedItem::Event(event) => assert_eq!(event.event.kind, "create_position"),
            other => panic!("unexpected item {:?}", other),
        }
        assert_eq!(item.block().height.as_i64(), 7);
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Parse {
            line: 3,
            message: "expected value".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error at line 3: expected value");
    }
}
