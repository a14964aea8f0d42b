// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{is_unique_violation, Database};
use crate::error::AppError;
use crate::models::{Setting, SettingDetail, SettingFields, UserSummary};
use crate::time_utils::now_rfc3339;
use std::collections::HashMap;

const COLUMNS: &str = "id, key, value, group_name, description, kind, visible, restricted, \
                       sort_order, user_id, created_at, updated_at";

/// Which settings a listing may return.
#[derive(Debug, Clone, Copy)]
pub struct SettingFilter<'a> {
    pub group: Option<&'a str>,
    pub include_hidden: bool,
    pub include_restricted: bool,
}

/// Fields a settings update may change. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SettingChanges {
    pub value: Option<String>,
    pub description: Option<String>,
    pub visible: Option<bool>,
    pub sort_order: Option<i64>,
}

impl Database {
    // ─── Setting Operations ──────────────────────────────────────

    /// Settings ordered by group, `ordem`, then key.
    pub async fn list_settings(&self, filter: SettingFilter<'_>) -> Result<Vec<Setting>, AppError> {
        let sql = format!(
            "SELECT {} FROM settings \
             WHERE (? IS NULL OR group_name = ?) AND (? OR visible = 1) AND (? OR restricted = 0) \
             ORDER BY group_name, sort_order, key",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(filter.group)
            .bind(filter.group)
            .bind(filter.include_hidden)
            .bind(filter.include_restricted)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Every setting with the user who last changed it.
    pub async fn list_settings_with_editor(&self) -> Result<Vec<SettingDetail>, AppError> {
        let settings = self
            .list_settings(SettingFilter {
                group: None,
                include_hidden: true,
                include_restricted: true,
            })
            .await?;

        let editors: HashMap<i64, UserSummary> = sqlx::query_as::<_, UserSummary>(
            "SELECT DISTINCT u.id, u.name, u.email FROM users u JOIN settings s ON s.user_id = u.id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

        Ok(settings
            .into_iter()
            .map(|setting| {
                let updated_by = setting.user_id.and_then(|id| editors.get(&id).cloned());
                SettingDetail { setting, updated_by }
            })
            .collect())
    }

    pub async fn get_setting(&self, id: i64) -> Result<Option<Setting>, AppError> {
        let sql = format!("SELECT {} FROM settings WHERE id = ?", COLUMNS);
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_setting_by_key(&self, key: &str) -> Result<Option<Setting>, AppError> {
        let sql = format!("SELECT {} FROM settings WHERE key = ?", COLUMNS);
        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Insert a setting. A duplicate key is a `Conflict`.
    pub async fn create_setting(&self, fields: &SettingFields) -> Result<Setting, AppError> {
        let now = now_rfc3339();
        let sql = format!(
            "INSERT INTO settings (key, value, group_name, description, kind, visible, restricted, \
             sort_order, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, Setting>(&sql)
            .bind(&fields.key)
            .bind(&fields.value)
            .bind(&fields.group)
            .bind(&fields.description)
            .bind(fields.kind.as_str())
            .bind(fields.visible)
            .bind(fields.restricted)
            .bind(fields.sort_order)
            .bind(fields.user_id)
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!("A setting with key '{}' already exists", fields.key))
                } else {
                    e.into()
                }
            })
    }

    /// Apply `changes` and record `user_id` as the editor.
    pub async fn update_setting(
        &self,
        id: i64,
        changes: &SettingChanges,
        user_id: i64,
    ) -> Result<Option<Setting>, AppError> {
        let sql = format!(
            "UPDATE settings SET value = COALESCE(?, value), description = COALESCE(?, description), \
             visible = COALESCE(?, visible), sort_order = COALESCE(?, sort_order), \
             user_id = ?, updated_at = ? WHERE id = ? RETURNING {}",
            COLUMNS
        );

        Ok(sqlx::query_as::<_, Setting>(&sql)
            .bind(&changes.value)
            .bind(&changes.description)
            .bind(changes.visible)
            .bind(changes.sort_order)
            .bind(user_id)
            .bind(now_rfc3339())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn delete_setting(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM settings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
