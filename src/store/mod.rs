//! Entity store abstraction consumed by the projectors.

use crate::domain::{AccountBalance, Address, BalanceId, PoolPosition, PositionId, ReferralBond};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Key-value persistence for the projected entities.
///
/// Every call is a suspension point. Callers guarantee a single writer, so no
/// method offers transactional or uniqueness guarantees beyond what is noted.
#[async_trait]
pub trait EntityStore: Send + Sync + fmt::Debug {
    async fn get_balance(&self, id: &BalanceId) -> Result<Option<AccountBalance>, StoreError>;

    /// Write a balance snapshot, replacing any previous one under the same id.
    async fn put_balance(&self, balance: &AccountBalance) -> Result<(), StoreError>;

    async fn get_bond(&self, id: &Address) -> Result<Option<ReferralBond>, StoreError>;

    /// Insert a bond if none exists for the account.
    ///
    /// # Returns
    /// `true` if the row was written, `false` if a bond was already stored.
    async fn create_bond(&self, bond: &ReferralBond) -> Result<bool, StoreError>;

    async fn get_position(&self, id: &PositionId) -> Result<Option<PoolPosition>, StoreError>;

    /// Create a position. Overwrites an existing entity with the same id.
    async fn create_position(&self, position: &PoolPosition) -> Result<(), StoreError>;

    /// Persist an in-place mutation of an existing position.
    ///
    /// # Returns
    /// `false` if no entity with that id exists.
    async fn save_position(&self, position: &PoolPosition) -> Result<bool, StoreError>;

    /// # Returns
    /// `true` if an entity was deleted.
    async fn remove_position(&self, id: &PositionId) -> Result<bool, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error("Corrupt {entity} row {id}: {reason}")]
    Corrupt {
        entity: &'static str,
        id: String,
        reason: String,
    },
}
