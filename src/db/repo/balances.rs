//! Account balance snapshot operations for the repository.

use crate::domain::{AccountBalance, Address, Amount, BalanceId, BlockHeight, ChainId, Denom};
use crate::store::StoreError;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

use super::Repository;

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Repository {
    /// Insert or replace a balance snapshot.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub async fn upsert_balance(&self, balance: &AccountBalance) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO account_balances (id, address, balance, last_height, last_date, chain_id, denom)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                address = excluded.address,
                balance = excluded.balance,
                last_height = excluded.last_height,
                last_date = excluded.last_date,
                chain_id = excluded.chain_id,
                denom = excluded.denom
            "#,
        )
        .bind(balance.id.as_str())
        .bind(balance.address.as_str())
        .bind(balance.balance.to_canonical_string())
        .bind(balance.last_height.as_i64())
        .bind(balance.last_date.format(DATE_FORMAT).to_string())
        .bind(balance.chain_id.as_str())
        .bind(balance.denom.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a balance snapshot by id.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored row cannot be decoded.
    pub async fn fetch_balance(&self, id: &BalanceId) -> Result<Option<AccountBalance>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, address, balance, last_height, last_date, chain_id, denom
            FROM account_balances
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| balance_from_row(&r)).transpose()
    }

    /// All snapshots recorded for an address, across keying modes and denoms.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row cannot be decoded.
    pub async fn query_balances_by_address(
        &self,
        address: &Address,
    ) -> Result<Vec<AccountBalance>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, address, balance, last_height, last_date, chain_id, denom
            FROM account_balances
            WHERE address = ?
            ORDER BY id ASC
            "#,
        )
        .bind(address.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(balance_from_row).collect()
    }
}

fn balance_from_row(row: &SqliteRow) -> Result<AccountBalance, StoreError> {
    let id: String = row.get("id");
    let balance_str: String = row.get("balance");
    let date_str: String = row.get("last_date");

    let balance = Amount::from_str(&balance_str).map_err(|e| StoreError::Corrupt {
        entity: "account_balance",
        id: id.clone(),
        reason: format!("balance {:?}: {}", balance_str, e),
    })?;
    let last_date =
        NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| StoreError::Corrupt {
            entity: "account_balance",
            id: id.clone(),
            reason: format!("last_date {:?}: {}", date_str, e),
        })?;

    Ok(AccountBalance {
        id: BalanceId(id),
        address: Address::new(row.get::<String, _>("address")),
        balance,
        last_height: BlockHeight::new(row.get("last_height")),
        last_date,
        chain_id: ChainId::new(row.get::<String, _>("chain_id")),
        denom: Denom::new(row.get::<String, _>("denom")),
    })
}
