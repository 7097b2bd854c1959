//! Repository layer for database operations.
//!
//! `Repository` is the SQLite-backed `EntityStore`. Methods are organized across
//! submodules by entity:
//! - `balances.rs` - account balance snapshots
//! - `bonds.rs` - referral bonds
//! - `positions.rs` - pool positions

mod balances;
mod bonds;
mod positions;

use crate::domain::{AccountBalance, Address, BalanceId, PoolPosition, PositionId, ReferralBond};
use crate::store::{EntityStore, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

/// Repository for database operations.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Cheap liveness probe used by the readiness endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl EntityStore for Repository {
    async fn get_balance(&self, id: &BalanceId) -> Result<Option<AccountBalance>, StoreError> {
        self.fetch_balance(id).await
    }

    async fn put_balance(&self, balance: &AccountBalance) -> Result<(), StoreError> {
        self.upsert_balance(balance).await?;
        Ok(())
    }

    async fn get_bond(&self, id: &Address) -> Result<Option<ReferralBond>, StoreError> {
        Ok(self.fetch_bond(id).await?)
    }

    async fn create_bond(&self, bond: &ReferralBond) -> Result<bool, StoreError> {
        Ok(self.insert_bond(bond).await?)
    }

    async fn get_position(&self, id: &PositionId) -> Result<Option<PoolPosition>, StoreError> {
        Ok(self.fetch_position(id).await?)
    }

    async fn create_position(&self, position: &PoolPosition) -> Result<(), StoreError> {
        self.upsert_position(position).await?;
        Ok(())
    }

    async fn save_position(&self, position: &PoolPosition) -> Result<bool, StoreError> {
        Ok(self.update_position(position).await?)
    }

    async fn remove_position(&self, id: &PositionId) -> Result<bool, StoreError> {
        Ok(self.delete_position(id).await?)
    }
}
