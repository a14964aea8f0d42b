//! Database layer (SQLite via sqlx).
//!
//! `Database` is a thin wrapper around a connection pool. Typed operations
//! live in one `impl Database` block per entity.

mod access_levels;
mod equipment_types;
mod menu;
mod schema;
mod settings;
mod themes;
mod users;

pub use settings::{SettingChanges, SettingFilter};

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Database handle shared by all handlers.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", url, e)))?;

        tracing::info!(url = %url, "Connected to database");

        Ok(Self { pool })
    }

    /// Fresh in-memory database, used by tests and the admin CLI dry runs.
    ///
    /// Every connection to `sqlite::memory:` gets its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Whether an sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "access_levels",
                "equipment_types",
                "menu_items",
                "refresh_tokens",
                "settings",
                "themes",
                "users"
            ]
        );
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let err = sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at, created_at) VALUES ('x', 999, '', '')",
        )
        .execute(db.pool())
        .await
        .unwrap_err();

        assert!(err.as_database_error().is_some());
    }
}
