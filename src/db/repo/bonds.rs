//! Referral bond operations for the repository.

use crate::domain::{Address, BlockHeight, ReferralBond, TimeMs};
use sqlx::Row;

use super::Repository;

impl Repository {
    /// Insert a bond idempotently.
    ///
    /// Returns `false` when a bond for the account already exists; the stored row
    /// is left untouched.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_bond(&self, bond: &ReferralBond) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO referral_bonds (id, referrer, height, ts)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(bond.id.as_str())
        .bind(bond.referrer.as_str())
        .bind(bond.height.as_i64())
        .bind(bond.ts.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the bond recorded for an account.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_bond(&self, id: &Address) -> Result<Option<ReferralBond>, sqlx::Error> {
        let row = sqlx::query("SELECT id, referrer, height, ts FROM referral_bonds WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| ReferralBond {
            id: Address::new(r.get::<String, _>("id")),
            referrer: r.get("referrer"),
            height: BlockHeight::new(r.get("height")),
            ts: TimeMs::new(r.get("ts")),
        }))
    }

    /// Accounts referred by `referrer`, oldest bond first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_bonds_by_referrer(
        &self,
        referrer: &Address,
    ) -> Result<Vec<ReferralBond>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, referrer, height, ts
            FROM referral_bonds
            WHERE referrer = ?
            ORDER BY height ASC, id ASC
            "#,
        )
        .bind(referrer.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ReferralBond {
                id: Address::new(r.get::<String, _>("id")),
                referrer: r.get("referrer"),
                height: BlockHeight::new(r.get("height")),
                ts: TimeMs::new(r.get("ts")),
            })
            .collect())
    }
}
