//! Balance ledger: `coinbase` and `transfer` events to running account balances.

use crate::config::ChainRegistry;
use crate::domain::{
    parse_coin, utc_day, AccountBalance, Address, Amount, AmountParseError, Attributes,
    BalanceId, BalanceKeying, ChainEvent, ChainId, Coin, Denom, Transaction,
};
use crate::store::{EntityStore, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

pub const COINBASE_EVENT: &str = "coinbase";
pub const TRANSFER_EVENT: &str = "transfer";

/// Why a balance event was left unapplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingAttribute(&'static str),
    InvalidAmount(AmountParseError),
    DenomNotAccepted(Denom),
    UnknownChain(ChainId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEvent {
    /// Position of the event in the transaction's event list.
    pub index: usize,
    pub kind: String,
    pub reason: SkipReason,
}

/// Outcome of projecting one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionReport {
    /// Balance snapshots written.
    pub writes: usize,
    pub skipped: Vec<SkippedEvent>,
}

enum EventEffect {
    Applied(usize),
    Skipped(SkipReason),
}

pub struct BalanceLedgerProjector {
    store: Arc<dyn EntityStore>,
    chains: ChainRegistry,
    keying: BalanceKeying,
}

impl BalanceLedgerProjector {
    pub fn new(store: Arc<dyn EntityStore>, chains: ChainRegistry, keying: BalanceKeying) -> Self {
        Self {
            store,
            chains,
            keying,
        }
    }

    /// Apply every `coinbase` and `transfer` event of `tx`, in order.
    ///
    /// Malformed or filtered events are skipped individually and reported; only
    /// store failures abort the transaction.
    ///
    /// # Errors
    /// Returns an error if a store read or write fails. Writes made for earlier
    /// events of the same transaction are kept.
    pub async fn project_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<TransactionReport, StoreError> {
        let mut report = TransactionReport::default();
        let chain_known = self.chains.settings(&tx.block.chain_id).is_some();
        if !chain_known {
            warn!(
                chain_id = %tx.block.chain_id,
                height = %tx.block.height,
                "No chain settings for transaction, balance events skipped"
            );
        }

        for (index, event) in tx.events.iter().enumerate() {
            if event.kind != COINBASE_EVENT && event.kind != TRANSFER_EVENT {
                continue;
            }

            let effect = if chain_known {
                self.apply_event(tx, event).await?
            } else {
                EventEffect::Skipped(SkipReason::UnknownChain(tx.block.chain_id.clone()))
            };

            match effect {
                EventEffect::Applied(writes) => report.writes += writes,
                EventEffect::Skipped(reason) => {
                    debug!(index, kind = %event.kind, ?reason, "Balance event skipped");
                    report.skipped.push(SkippedEvent {
                        index,
                        kind: event.kind.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }

    async fn apply_event(
        &self,
        tx: &Transaction,
        event: &ChainEvent,
    ) -> Result<EventEffect, StoreError> {
        let attrs = event.attributes();
        if event.kind == COINBASE_EVENT {
            self.apply_coinbase(tx, &attrs).await
        } else {
            self.apply_transfer(tx, &attrs).await
        }
    }

    async fn apply_coinbase(
        &self,
        tx: &Transaction,
        attrs: &Attributes,
    ) -> Result<EventEffect, StoreError> {
        let Some(amount) = attrs.non_empty("amount") else {
            return Ok(EventEffect::Skipped(SkipReason::MissingAttribute("amount")));
        };
        let Some(minter) = attrs.non_empty("minter") else {
            return Ok(EventEffect::Skipped(SkipReason::MissingAttribute("minter")));
        };
        let coin = match self.accepted_coin(tx, amount) {
            Ok(coin) => coin,
            Err(reason) => return Ok(EventEffect::Skipped(reason)),
        };

        let minter = Address::new(minter);
        let id = BalanceId::new(self.keying, &minter, &coin.denom);
        let current = self.current_balance(&id).await?;
        self.write_snapshot(tx, id, minter, &current + &coin.amount, &coin.denom)
            .await?;

        Ok(EventEffect::Applied(1))
    }

    /// Credit the recipient, then debit the sender.
    ///
    /// Both deltas are computed from balances read before either write, so a
    /// self-transfer leaves the balance where it started.
    async fn apply_transfer(
        &self,
        tx: &Transaction,
        attrs: &Attributes,
    ) -> Result<EventEffect, StoreError> {
        let Some(amount) = attrs.non_empty("amount") else {
            return Ok(EventEffect::Skipped(SkipReason::MissingAttribute("amount")));
        };
        let Some(recipient) = attrs.non_empty("recipient") else {
            return Ok(EventEffect::Skipped(SkipReason::MissingAttribute(
                "recipient",
            )));
        };
        let Some(sender) = attrs.non_empty("sender") else {
            return Ok(EventEffect::Skipped(SkipReason::MissingAttribute("sender")));
        };
        let coin = match self.accepted_coin(tx, amount) {
            Ok(coin) => coin,
            Err(reason) => return Ok(EventEffect::Skipped(reason)),
        };

        let recipient = Address::new(recipient);
        let sender = Address::new(sender);
        let recipient_id = BalanceId::new(self.keying, &recipient, &coin.denom);
        let sender_id = BalanceId::new(self.keying, &sender, &coin.denom);

        let recipient_before = self.current_balance(&recipient_id).await?;
        let sender_before = if sender_id == recipient_id {
            recipient_before.clone()
        } else {
            self.current_balance(&sender_id).await?
        };

        self.write_snapshot(
            tx,
            recipient_id.clone(),
            recipient,
            &recipient_before + &coin.amount,
            &coin.denom,
        )
        .await?;

        let sender_after = if sender_id == recipient_id {
            // The credit above and this debit share one baseline and cancel.
            &(&sender_before + &coin.amount) - &coin.amount
        } else {
            &sender_before - &coin.amount
        };
        self.write_snapshot(tx, sender_id, sender, sender_after, &coin.denom)
            .await?;

        Ok(EventEffect::Applied(2))
    }

    fn accepted_coin(&self, tx: &Transaction, raw: &str) -> Result<Coin, SkipReason> {
        let coin = parse_coin(raw).map_err(SkipReason::InvalidAmount)?;
        if !self.chains.accepts_denom(&tx.block.chain_id, &coin.denom) {
            return Err(SkipReason::DenomNotAccepted(coin.denom));
        }
        Ok(coin)
    }

    async fn current_balance(&self, id: &BalanceId) -> Result<Amount, StoreError> {
        Ok(self
            .store
            .get_balance(id)
            .await?
            .map(|snapshot| snapshot.balance)
            .unwrap_or_else(Amount::zero))
    }

    async fn write_snapshot(
        &self,
        tx: &Transaction,
        id: BalanceId,
        address: Address,
        balance: Amount,
        denom: &Denom,
    ) -> Result<(), StoreError> {
        debug!(id = %id, balance = %balance, height = %tx.block.height, "Balance updated");
        self.store
            .put_balance(&AccountBalance {
                id,
                address,
                balance,
                last_height: tx.block.height,
                last_date: utc_day(&tx.block.time),
                chain_id: tx.block.chain_id.clone(),
                denom: denom.clone(),
            })
            .await
    }
}
