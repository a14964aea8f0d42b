// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Theme storage. At most one theme is the default; switching it happens in
//! a single transaction.

use super::{is_unique_violation, Database};
use crate::error::AppError;
use crate::models::{Theme, ThemeDetail, ThemeFields, UserSummary};
use crate::time_utils::now_rfc3339;
use std::collections::HashMap;

const COLUMNS: &str = "id, name, description, primary_color, secondary_color, light_background, \
                       dark_background, light_text, dark_text, logo_url, favicon_url, main_font, \
                       is_default, custom, active, custom_css, user_id, created_at, updated_at";

fn name_taken(name: &str) -> AppError {
    AppError::BadRequest(format!("A theme named '{}' already exists", name))
}

impl Database {
    // ─── Theme Operations ────────────────────────────────────────

    pub async fn list_active_themes(&self) -> Result<Vec<Theme>, AppError> {
        let sql = format!("SELECT {} FROM themes WHERE active = 1 ORDER BY name", COLUMNS);
        Ok(sqlx::query_as::<_, Theme>(&sql).fetch_all(&self.pool).await?)
    }

    /// Every theme with its owner resolved.
    pub async fn list_themes_with_owner(&self) -> Result<Vec<ThemeDetail>, AppError> {
        let sql = format!("SELECT {} FROM themes ORDER BY name", COLUMNS);
        let themes = sqlx::query_as::<_, Theme>(&sql).fetch_all(&self.pool).await?;

        let owners: HashMap<i64, UserSummary> = sqlx::query_as::<_, UserSummary>(
            "SELECT DISTINCT u.id, u.name, u.email FROM users u JOIN themes t ON t.user_id = u.id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

        Ok(themes
            .into_iter()
            .map(|theme| {
                let owner = theme.user_id.and_then(|id| owners.get(&id).cloned());
                ThemeDetail { theme, owner }
            })
            .collect())
    }

    pub async fn get_theme(&self, id: i64) -> Result<Option<Theme>, AppError> {
        let sql = format!("SELECT {} FROM themes WHERE id = ?", COLUMNS);
        Ok(sqlx::query_as::<_, Theme>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_theme_by_name(&self, name: &str) -> Result<Option<Theme>, AppError> {
        let sql = format!("SELECT {} FROM themes WHERE name = ?", COLUMNS);
        Ok(sqlx::query_as::<_, Theme>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// The default theme if it is active, otherwise the oldest active theme.
    pub async fn get_default_theme(&self) -> Result<Option<Theme>, AppError> {
        let sql = format!(
            "SELECT {} FROM themes WHERE active = 1 ORDER BY is_default DESC, id LIMIT 1",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, Theme>(&sql)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Insert a theme. If it is the new default, the previous default is
    /// cleared in the same transaction.
    pub async fn create_theme(&self, fields: &ThemeFields) -> Result<Theme, AppError> {
        let now = now_rfc3339();
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            sqlx::query("UPDATE themes SET is_default = 0, updated_at = ? WHERE is_default = 1")
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "INSERT INTO themes (name, description, primary_color, secondary_color, light_background, \
             dark_background, light_text, dark_text, logo_url, favicon_url, main_font, is_default, \
             custom, active, custom_css, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );

        let theme = sqlx::query_as::<_, Theme>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.primary_color)
            .bind(&fields.secondary_color)
            .bind(&fields.light_background)
            .bind(&fields.dark_background)
            .bind(&fields.light_text)
            .bind(&fields.dark_text)
            .bind(&fields.logo_url)
            .bind(&fields.favicon_url)
            .bind(&fields.main_font)
            .bind(fields.is_default)
            .bind(fields.custom)
            .bind(fields.active)
            .bind(&fields.custom_css)
            .bind(fields.user_id)
            .bind(&now)
            .bind(&now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| if is_unique_violation(&e) { name_taken(&fields.name) } else { e.into() })?;

        tx.commit().await?;
        Ok(theme)
    }

    /// Overwrite a theme. Returns `None` if it does not exist.
    pub async fn update_theme(&self, id: i64, fields: &ThemeFields) -> Result<Option<Theme>, AppError> {
        let now = now_rfc3339();
        let mut tx = self.pool.begin().await?;

        if fields.is_default {
            sqlx::query("UPDATE themes SET is_default = 0, updated_at = ? WHERE is_default = 1 AND id != ?")
                .bind(&now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let sql = format!(
            "UPDATE themes SET name = ?, description = ?, primary_color = ?, secondary_color = ?, \
             light_background = ?, dark_background = ?, light_text = ?, dark_text = ?, logo_url = ?, \
             favicon_url = ?, main_font = ?, is_default = ?, custom = ?, active = ?, custom_css = ?, \
             user_id = ?, updated_at = ? WHERE id = ? RETURNING {}",
            COLUMNS
        );

        let theme = sqlx::query_as::<_, Theme>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.primary_color)
            .bind(&fields.secondary_color)
            .bind(&fields.light_background)
            .bind(&fields.dark_background)
            .bind(&fields.light_text)
            .bind(&fields.dark_text)
            .bind(&fields.logo_url)
            .bind(&fields.favicon_url)
            .bind(&fields.main_font)
            .bind(fields.is_default)
            .bind(fields.custom)
            .bind(fields.active)
            .bind(&fields.custom_css)
            .bind(fields.user_id)
            .bind(&now)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| if is_unique_violation(&e) { name_taken(&fields.name) } else { e.into() })?;

        if theme.is_some() {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(theme)
    }

    /// Make `id` the only default theme. Returns false if it does not exist.
    pub async fn set_default_theme(&self, id: i64) -> Result<bool, AppError> {
        let now = now_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE themes SET is_default = 0, updated_at = ? WHERE is_default = 1 AND id != ?")
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE themes SET is_default = 1, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    pub async fn delete_theme(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM themes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
