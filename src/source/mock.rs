//! In-memory feed for tests.

use super::{EventSource, FeedItem, SourceError};
use crate::domain::{BlockEvent, ContractExecution, Transaction};
use async_trait::async_trait;
use std::collections::VecDeque;

/// Source that yields a predefined list of items, then ends.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    items: VecDeque<FeedItem>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: FeedItem) -> Self {
        self.items.push_back(item);
        self
    }

    pub fn with_transaction(self, tx: Transaction) -> Self {
        self.with_item(FeedItem::Transaction(tx))
    }

    pub fn with_event(self, event: BlockEvent) -> Self {
        self.with_item(FeedItem::Event(event))
    }

    pub fn with_execution(self, exec: ContractExecution) -> Self {
        self.with_item(FeedItem::ContractExecution(exec))
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl EventSource for MockSource {
    async fn next_item(&mut self) -> Result<Option<FeedItem>, SourceError> {
        Ok(self.items.pop_front())
    }
}
