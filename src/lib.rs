pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod orchestration;
pub mod projection;
pub mod source;
pub mod store;

pub use config::{ChainRegistry, ChainSettings, Config};
pub use db::{init_db, Repository};
pub use domain::{
    AccountBalance, Address, Amount, Attributes, BalanceKeying, BlockEvent, BlockHeader,
    BlockHeight, ChainEvent, ChainId, ContractExecution, Denom, PoolPosition, PositionId,
    ReferralBond, TimeMs, Transaction,
};
pub use error::AppError;
pub use orchestration::{Dispatcher, Indexer, IndexerStats};
pub use source::{EventSource, FeedItem, JsonlSource, MockSource};
pub use store::{EntityStore, MemoryStore, StoreError};
