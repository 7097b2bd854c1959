//! Referral bonds from decoded bond executions.

use crate::domain::{Address, BondExecution, ReferralBond};
use crate::store::{EntityStore, StoreError};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BondOutcome {
    Registered(ReferralBond),
    SelfReferral(Address),
    AlreadyBonded(Address),
}

pub struct BondRegistrar {
    store: Arc<dyn EntityStore>,
}

impl BondRegistrar {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Record the sender's first bond. Self-referrals and repeat bonds are no-ops.
    ///
    /// # Errors
    /// Returns an error if the store lookup or insert fails.
    pub async fn project_bond_execution(
        &self,
        msg: &BondExecution,
    ) -> Result<BondOutcome, StoreError> {
        info!(height = %msg.block.height, sender = %msg.sender, "New bond execution");

        let referral = msg.referral.clone().unwrap_or_default();
        if referral == msg.sender.as_str() {
            info!(sender = %msg.sender, "Account cannot refer itself");
            return Ok(BondOutcome::SelfReferral(msg.sender.clone()));
        }

        if self.store.get_bond(&msg.sender).await?.is_some() {
            info!(sender = %msg.sender, "Account already bonded");
            return Ok(BondOutcome::AlreadyBonded(msg.sender.clone()));
        }

        let bond = ReferralBond {
            id: msg.sender.clone(),
            referrer: referral,
            height: msg.block.height,
            ts: msg.block.time_ms(),
        };
        if !self.store.create_bond(&bond).await? {
            return Ok(BondOutcome::AlreadyBonded(msg.sender.clone()));
        }

        Ok(BondOutcome::Registered(bond))
    }
}
