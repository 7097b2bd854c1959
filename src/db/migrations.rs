//! Database migrations and initialization.

use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use tracing::{debug, info};

/// Bumped whenever `schema.sql` changes shape.
pub const SCHEMA_VERSION: i64 = 1;

/// Open (or create) the SQLite database at `db_path` and bring its schema up to date.
pub async fn init_db(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await?;

    run_migrations(&pool).await?;

    info!(path = %db_path, "Database initialized");
    Ok(pool)
}

/// Single-connection in-memory database, used by tests and dry runs.
pub async fn init_memory_db() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let current: i64 = sqlx::query("PRAGMA user_version")
        .fetch_one(pool)
        .await?
        .get(0);

    if current >= SCHEMA_VERSION {
        debug!(version = current, "Schema up to date");
        return Ok(());
    }

    info!(from = current, to = SCHEMA_VERSION, "Running database migrations");
    let mut tx = pool.begin().await?;
    for statement in include_str!("schema.sql").split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(&mut *tx).await?;
        }
    }
    // PRAGMA does not accept bound parameters.
    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(())
}

async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    debug!(journal_mode = %journal_mode, "SQLite journal mode");

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_db_path(temp_dir: &TempDir) -> String {
        temp_dir
            .path()
            .join("nested")
            .join("ledger.db")
            .to_string_lossy()
            .to_string()
    }

    #[tokio::test]
    async fn test_init_db_creates_database_and_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_db_path(&temp_dir);

        let pool = init_db(&db_path).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());

        let result: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let pool = init_memory_db().await.expect("init failed");

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("query failed");
        let names: Vec<&str> = rows.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(
            names,
            vec!["account_balances", "pool_positions", "referral_bonds"]
        );
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let pool = init_memory_db().await.expect("init failed");
        run_migrations(&pool)
            .await
            .expect("second migration run failed");

        let version: (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(version.0, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_reopen_existing_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_db_path(&temp_dir);

        let pool = init_db(&db_path).await.expect("first open failed");
        pool.close().await;
        let pool = init_db(&db_path).await.expect("second open failed");

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        // WAL is best-effort; some filesystems fall back.
        assert!(
            matches!(result.0.as_str(), "wal" | "delete"),
            "unexpected journal_mode: {}",
            result.0
        );
    }
}
