//! Domain types for the chain projection layer.
//!
//! This module provides:
//! - Primitives: TimeMs, BlockHeight, Address, ChainId, Denom
//! - Arbitrary-precision amounts and the chain-native coin parser
//! - The typed attribute accessor over event key/value lists
//! - Decoded inputs (transactions, block events, contract executions)
//! - Projected entities: AccountBalance, ReferralBond, PoolPosition

pub mod amount;
pub mod attributes;
pub mod balance;
pub mod bond;
pub mod event;
pub mod position;
pub mod primitives;

pub use amount::{parse_coin, Amount, AmountParseError, Coin};
pub use attributes::Attributes;
pub use balance::{AccountBalance, BalanceId, BalanceKeying};
pub use bond::ReferralBond;
pub use event::{
    BlockEvent, BlockHeader, BondExecution, ChainEvent, ContractExecution, EventAttribute,
    Transaction,
};
pub use position::{PoolPosition, PositionId, PositionStatus};
pub use primitives::{utc_day, Address, BlockHeight, ChainId, Denom, TimeMs};
