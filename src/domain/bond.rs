//! One-time referral bond per account.

use serde::{Deserialize, Serialize};

use super::{Address, BlockHeight, TimeMs};

/// Immutable record of an account's first bond and who referred it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralBond {
    /// Bonding account.
    pub id: Address,
    /// Referrer address, empty when no referral was supplied.
    pub referrer: String,
    pub height: BlockHeight,
    pub ts: TimeMs,
}
