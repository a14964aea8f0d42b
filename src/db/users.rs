// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User and refresh-token storage.

use super::Database;
use crate::error::AppError;
use crate::models::{NewUser, RefreshToken, User, UserSummary};
use crate::time_utils::now_rfc3339;

const USER_COLUMNS: &str = "id, name, email, password_hash, job_title, active, access_level_id, \
                            avatar, created_at, updated_at";

impl Database {
    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Look up a user by email. The address is compared lowercased.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_user_summary(&self, id: i64) -> Result<Option<UserSummary>, AppError> {
        Ok(
            sqlx::query_as::<_, UserSummary>("SELECT id, name, email FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Insert a user. Fails with `Conflict` if the email is taken.
    pub async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let now = now_rfc3339();
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, job_title, active, access_level_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(user.email.trim().to_lowercase())
            .bind(&user.password_hash)
            .bind(&user.job_title)
            .bind(user.active)
            .bind(user.access_level_id)
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if super::is_unique_violation(&e) {
                    AppError::Conflict(format!("Email already registered: {}", user.email))
                } else {
                    e.into()
                }
            })
    }

    /// Change a user's access level. Returns false if no user has that email.
    pub async fn set_user_access_level(&self, email: &str, access_level_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET access_level_id = ?, updated_at = ? WHERE email = ?")
            .bind(access_level_id)
            .bind(now_rfc3339())
            .bind(email.trim().to_lowercase())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_user_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(now_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ─── Refresh Token Operations ────────────────────────────────

    pub async fn store_refresh_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError> {
        Ok(sqlx::query_as::<_, RefreshToken>(
            "SELECT id, token_hash, user_id, expires_at, created_at FROM refresh_tokens WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Delete a refresh token. Returns whether a row was removed.
    pub async fn delete_refresh_token(&self, token_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically replace `old_hash` with `new_hash`.
    ///
    /// Returns false, leaving the database untouched, if `old_hash` was
    /// already consumed by a concurrent rotation or logout.
    pub async fn rotate_refresh_token(
        &self,
        old_hash: &str,
        new_hash: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
            .bind(old_hash)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(new_hash)
        .bind(user_id)
        .bind(expires_at)
        .bind(now_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Remove expired refresh tokens, optionally only those of one user.
    pub async fn purge_expired_refresh_tokens(&self, user_id: Option<i64>) -> Result<u64, AppError> {
        // Timestamps share one fixed-width UTC format, so text comparison orders them.
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE expires_at <= ? AND (? IS NULL OR user_id = ?)",
        )
        .bind(now_rfc3339())
        .bind(user_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_refresh_tokens(&self, user_id: i64) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
