//! Event-to-state projectors.
//!
//! Each projector reads current entity state from an `EntityStore`, computes the
//! new state and writes it back before returning. None of them keeps state between
//! calls; correctness relies on the caller delivering inputs one at a time in
//! chain order.

pub mod balances;
pub mod bonds;
pub mod positions;

pub use balances::{BalanceLedgerProjector, SkipReason, SkippedEvent, TransactionReport};
pub use bonds::{BondOutcome, BondRegistrar};
pub use positions::{
    FungifyOutcome, IgnoreReason, PositionLifecycleProjector, PositionOutcome,
    CONCENTRATED_LIQUIDITY_MODULE,
};
