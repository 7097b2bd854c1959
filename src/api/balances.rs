use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{AccountBalance, Address};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancesResponse {
    pub address: String,
    pub balances: Vec<BalanceDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDto {
    pub id: String,
    pub balance: String,
    pub denom: String,
    pub chain_id: String,
    pub last_height: i64,
    pub last_date: String,
}

impl From<AccountBalance> for BalanceDto {
    fn from(b: AccountBalance) -> Self {
        Self {
            id: b.id.0,
            balance: b.balance.to_canonical_string(),
            denom: b.denom.0,
            chain_id: b.chain_id.0,
            last_height: b.last_height.as_i64(),
            last_date: b.last_date.to_string(),
        }
    }
}

pub async fn get_balances(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<BalancesResponse>, AppError> {
    let address = Address::new(address);
    let balances = state.repo.query_balances_by_address(&address).await?;
    if balances.is_empty() {
        return Err(AppError::NotFound(format!("no balance for {}", address)));
    }

    Ok(Json(BalancesResponse {
        address: address.0,
        balances: balances.into_iter().map(BalanceDto::from).collect(),
    }))
}
