//! Routes feed items to the projector responsible for them.

use crate::config::Config;
use crate::domain::{BlockEvent, ContractExecution};
use crate::projection::{
    BalanceLedgerProjector, BondOutcome, BondRegistrar, FungifyOutcome,
    PositionLifecycleProjector, PositionOutcome, TransactionReport,
};
use crate::source::FeedItem;
use crate::store::{EntityStore, StoreError};
use std::sync::Arc;
use tracing::debug;

pub const CREATE_POSITION_EVENT: &str = "create_position";
pub const WITHDRAW_POSITION_EVENT: &str = "withdraw_position";
pub const FUNGIFY_POSITIONS_EVENT: &str = "fungify_charged_position";

/// What a single dispatched item did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Transaction(TransactionReport),
    Position(PositionOutcome),
    Fungify(FungifyOutcome),
    Bond(BondOutcome),
    /// No projector handles this item.
    Unhandled,
}

pub struct Dispatcher {
    balances: BalanceLedgerProjector,
    bonds: BondRegistrar,
    positions: PositionLifecycleProjector,
    bond_contract: Option<String>,
}

impl Dispatcher {
    /// Build every projector over one shared store from the startup configuration.
    pub fn new(store: Arc<dyn EntityStore>, config: &Config) -> Self {
        Self {
            balances: BalanceLedgerProjector::new(
                store.clone(),
                config.chains.clone(),
                config.balance_keying,
            ),
            bonds: BondRegistrar::new(store.clone()),
            positions: PositionLifecycleProjector::new(store, config.position_pools()),
            bond_contract: config.bond_contract.clone(),
        }
    }

    /// # Errors
    /// Returns an error if the projector handling the item hits a store failure.
    pub async fn dispatch(&self, item: &FeedItem) -> Result<Dispatched, StoreError> {
        match item {
            FeedItem::Transaction(tx) => self
                .balances
                .project_transaction(tx)
                .await
                .map(Dispatched::Transaction),
            FeedItem::Event(event) => self.dispatch_event(event).await,
            FeedItem::ContractExecution(exec) => self.dispatch_execution(exec).await,
        }
    }

    async fn dispatch_event(&self, input: &BlockEvent) -> Result<Dispatched, StoreError> {
        match input.event.kind.as_str() {
            CREATE_POSITION_EVENT => self
                .positions
                .create(input)
                .await
                .map(Dispatched::Position),
            WITHDRAW_POSITION_EVENT => self
                .positions
                .remove(input)
                .await
                .map(Dispatched::Position),
            FUNGIFY_POSITIONS_EVENT => self
                .positions
                .fungify(input)
                .await
                .map(Dispatched::Fungify),
            other => {
                debug!(kind = %other, "No handler for event type");
                Ok(Dispatched::Unhandled)
            }
        }
    }

    async fn dispatch_execution(&self, exec: &ContractExecution) -> Result<Dispatched, StoreError> {
        if let Some(contract) = &self.bond_contract {
            if exec.contract.as_str() != contract {
                debug!(contract = %exec.contract, "Execution against untracked contract");
                return Ok(Dispatched::Unhandled);
            }
        }

        match exec.as_bond() {
            Some(bond) => self
                .bonds
                .project_bond_execution(&bond)
                .await
                .map(Dispatched::Bond),
            None => Ok(Dispatched::Unhandled),
        }
    }
}
