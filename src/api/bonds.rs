use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{Address, ReferralBond};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondDto {
    pub address: String,
    pub referrer: String,
    pub height: i64,
    pub ts: i64,
}

impl From<ReferralBond> for BondDto {
    fn from(bond: ReferralBond) -> Self {
        Self {
            address: bond.id.0,
            referrer: bond.referrer,
            height: bond.height.as_i64(),
            ts: bond.ts.as_i64(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralsResponse {
    pub referrer: String,
    pub referral_count: usize,
    pub referrals: Vec<BondDto>,
}

pub async fn get_bond(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<BondDto>, AppError> {
    let address = Address::new(address);
    let bond = state
        .repo
        .fetch_bond(&address)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no bond for {}", address)))?;

    Ok(Json(BondDto::from(bond)))
}

/// Accounts that bonded with `address` as their referrer.
pub async fn get_referrals(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ReferralsResponse>, AppError> {
    let address = Address::new(address);
    let referrals: Vec<BondDto> = state
        .repo
        .query_bonds_by_referrer(&address)
        .await?
        .into_iter()
        .map(BondDto::from)
        .collect();

    Ok(Json(ReferralsResponse {
        referrer: address.0,
        referral_count: referrals.len(),
        referrals,
    }))
}
