// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{is_unique_violation, Database};
use crate::error::AppError;
use crate::models::AccessLevel;
use crate::time_utils::now_rfc3339;
use serde_json::Value;
use sqlx::types::Json;

const COLUMNS: &str = "id, name, description, permissions, created_at, updated_at";

fn name_taken(name: &str) -> AppError {
    AppError::BadRequest(format!("An access level named '{}' already exists", name))
}

impl Database {
    // ─── Access Level Operations ─────────────────────────────────

    pub async fn list_access_levels(&self) -> Result<Vec<AccessLevel>, AppError> {
        let sql = format!("SELECT {} FROM access_levels ORDER BY id", COLUMNS);
        Ok(sqlx::query_as::<_, AccessLevel>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_access_level(&self, id: i64) -> Result<Option<AccessLevel>, AppError> {
        let sql = format!("SELECT {} FROM access_levels WHERE id = ?", COLUMNS);
        Ok(sqlx::query_as::<_, AccessLevel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_access_level_by_name(&self, name: &str) -> Result<Option<AccessLevel>, AppError> {
        let sql = format!("SELECT {} FROM access_levels WHERE name = ?", COLUMNS);
        Ok(sqlx::query_as::<_, AccessLevel>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn create_access_level(
        &self,
        name: &str,
        description: Option<&str>,
        permissions: Option<&Value>,
    ) -> Result<AccessLevel, AppError> {
        let now = now_rfc3339();
        let sql = format!(
            "INSERT INTO access_levels (name, description, permissions, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, AccessLevel>(&sql)
            .bind(name)
            .bind(description)
            .bind(permissions.map(Json))
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| if is_unique_violation(&e) { name_taken(name) } else { e.into() })
    }

    /// Overwrite an access level. Returns `None` if it does not exist.
    pub async fn update_access_level(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
        permissions: Option<&Value>,
    ) -> Result<Option<AccessLevel>, AppError> {
        let sql = format!(
            "UPDATE access_levels SET name = ?, description = ?, permissions = ?, updated_at = ? \
             WHERE id = ? RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, AccessLevel>(&sql)
            .bind(name)
            .bind(description)
            .bind(permissions.map(Json))
            .bind(now_rfc3339())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| if is_unique_violation(&e) { name_taken(name) } else { e.into() })
    }

    pub async fn delete_access_level(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM access_levels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_users_with_access_level(&self, id: i64) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE access_level_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
