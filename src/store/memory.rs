//! In-process store for tests and dry runs.

use super::{EntityStore, StoreError};
use crate::domain::{AccountBalance, Address, BalanceId, PoolPosition, PositionId, ReferralBond};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Store backed by ordered maps. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    balances: RwLock<BTreeMap<BalanceId, AccountBalance>>,
    bonds: RwLock<BTreeMap<Address, ReferralBond>>,
    positions: RwLock<BTreeMap<PositionId, PoolPosition>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a position directly, bypassing the projectors.
    pub async fn with_position(self, position: PoolPosition) -> Self {
        self.positions
            .write()
            .await
            .insert(position.id.clone(), position);
        self
    }

    pub async fn balances(&self) -> Vec<AccountBalance> {
        self.balances.read().await.values().cloned().collect()
    }

    pub async fn bonds(&self) -> Vec<ReferralBond> {
        self.bonds.read().await.values().cloned().collect()
    }

    pub async fn positions(&self) -> Vec<PoolPosition> {
        self.positions.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_balance(&self, id: &BalanceId) -> Result<Option<AccountBalance>, StoreError> {
        Ok(self.balances.read().await.get(id).cloned())
    }

    async fn put_balance(&self, balance: &AccountBalance) -> Result<(), StoreError> {
        self.balances
            .write()
            .await
            .insert(balance.id.clone(), balance.clone());
        Ok(())
    }

    async fn get_bond(&self, id: &Address) -> Result<Option<ReferralBond>, StoreError> {
        Ok(self.bonds.read().await.get(id).cloned())
    }

    async fn create_bond(&self, bond: &ReferralBond) -> Result<bool, StoreError> {
        let mut bonds = self.bonds.write().await;
        if bonds.contains_key(&bond.id) {
            return Ok(false);
        }
        bonds.insert(bond.id.clone(), bond.clone());
        Ok(true)
    }

    async fn get_position(&self, id: &PositionId) -> Result<Option<PoolPosition>, StoreError> {
        Ok(self.positions.read().await.get(id).cloned())
    }

    async fn create_position(&self, position: &PoolPosition) -> Result<(), StoreError> {
        self.positions
            .write()
            .await
            .insert(position.id.clone(), position.clone());
        Ok(())
    }

    async fn save_position(&self, position: &PoolPosition) -> Result<bool, StoreError> {
        let mut positions = self.positions.write().await;
        match positions.get_mut(&position.id) {
            Some(existing) => {
                *existing = position.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_position(&self, id: &PositionId) -> Result<bool, StoreError> {
        Ok(self.positions.write().await.remove(id).is_some())
    }
}
