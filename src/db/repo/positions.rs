//! Pool position operations for the repository.

use crate::domain::{BlockHeight, PoolPosition, PositionId, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Repository;

impl Repository {
    /// Insert a position, replacing any row with the same id.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub async fn upsert_position(&self, position: &PoolPosition) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO pool_positions
            (id, pool_id, height, created_at, closed_at, closed_height)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(position.id.as_str())
        .bind(position.pool_id.as_str())
        .bind(position.height.as_i64())
        .bind(position.created_at.as_i64())
        .bind(position.closed_at.map(|t| t.as_i64()))
        .bind(position.closed_height.map(|h| h.as_i64()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrite the mutable fields of an existing position.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn update_position(&self, position: &PoolPosition) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE pool_positions
            SET pool_id = ?, height = ?, created_at = ?, closed_at = ?, closed_height = ?
            WHERE id = ?
            "#,
        )
        .bind(position.pool_id.as_str())
        .bind(position.height.as_i64())
        .bind(position.created_at.as_i64())
        .bind(position.closed_at.map(|t| t.as_i64()))
        .bind(position.closed_height.map(|h| h.as_i64()))
        .bind(position.id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_position(&self, id: &PositionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pool_positions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn fetch_position(&self, id: &PositionId) -> Result<Option<PoolPosition>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, pool_id, height, created_at, closed_at, closed_height
            FROM pool_positions
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(position_from_row))
    }

    /// Positions of a pool, ordered by composite id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn query_positions_by_pool(
        &self,
        pool_id: &str,
    ) -> Result<Vec<PoolPosition>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, pool_id, height, created_at, closed_at, closed_height
            FROM pool_positions
            WHERE pool_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(position_from_row).collect())
    }
}

fn position_from_row(row: &SqliteRow) -> PoolPosition {
    PoolPosition {
        id: PositionId::new(row.get::<String, _>("id")),
        pool_id: row.get("pool_id"),
        height: BlockHeight::new(row.get("height")),
        created_at: TimeMs::new(row.get("created_at")),
        closed_at: row.get::<Option<i64>, _>("closed_at").map(TimeMs::new),
        closed_height: row
            .get::<Option<i64>, _>("closed_height")
            .map(BlockHeight::new),
    }
}
