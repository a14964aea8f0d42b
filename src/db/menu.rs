// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Menu item storage.

use super::Database;
use crate::error::AppError;
use crate::models::{MenuItem, MenuItemFields, MenuOrderEntry};
use crate::time_utils::now_rfc3339;
use sqlx::types::Json;

const COLUMNS: &str = "id, title, description, icon, url, component, sort_order, active, external, \
                       requires_auth, min_level, permissions, parent_id, created_at, updated_at";

impl Database {
    // ─── Menu Operations ─────────────────────────────────────────

    /// Active items, suitable for building the public tree.
    pub async fn list_active_menu_items(&self) -> Result<Vec<MenuItem>, AppError> {
        let sql = format!(
            "SELECT {} FROM menu_items WHERE active = 1 ORDER BY sort_order, id",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, MenuItem>(&sql).fetch_all(&self.pool).await?)
    }

    /// Active items visible to `level` (items with `min_level >= level`).
    pub async fn list_menu_items_for_level(&self, level: i64) -> Result<Vec<MenuItem>, AppError> {
        let sql = format!(
            "SELECT {} FROM menu_items WHERE active = 1 AND min_level >= ? ORDER BY sort_order, id",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(level)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Every item, roots first, then by parent and order.
    pub async fn list_all_menu_items(&self) -> Result<Vec<MenuItem>, AppError> {
        let sql = format!(
            "SELECT {} FROM menu_items ORDER BY parent_id IS NOT NULL, parent_id, sort_order, id",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, MenuItem>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn get_menu_item(&self, id: i64) -> Result<Option<MenuItem>, AppError> {
        let sql = format!("SELECT {} FROM menu_items WHERE id = ?", COLUMNS);
        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_menu_children(&self, id: i64) -> Result<Vec<MenuItem>, AppError> {
        let sql = format!(
            "SELECT {} FROM menu_items WHERE parent_id = ? ORDER BY sort_order, id",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn count_menu_children(&self, id: i64) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items WHERE parent_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Ids on the parent chain of `id`, starting with `id` itself.
    pub async fn menu_ancestor_ids(&self, id: i64) -> Result<Vec<i64>, AppError> {
        // UNION (not UNION ALL) stops at the first repeated row if the chain loops.
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            WITH RECURSIVE chain(id, parent_id) AS (
                SELECT id, parent_id FROM menu_items WHERE id = ?
                UNION
                SELECT m.id, m.parent_id FROM menu_items m JOIN chain c ON m.id = c.parent_id
            )
            SELECT id FROM chain
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn create_menu_item(&self, fields: &MenuItemFields) -> Result<MenuItem, AppError> {
        let now = now_rfc3339();
        let sql = format!(
            "INSERT INTO menu_items (title, description, icon, url, component, sort_order, active, external, \
             requires_auth, min_level, permissions, parent_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            COLUMNS
        );

        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.icon)
            .bind(&fields.url)
            .bind(&fields.component)
            .bind(fields.sort_order)
            .bind(fields.active)
            .bind(fields.external)
            .bind(fields.requires_auth)
            .bind(fields.min_level)
            .bind(fields.permissions.as_ref().map(Json))
            .bind(fields.parent_id)
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn update_menu_item(
        &self,
        id: i64,
        fields: &MenuItemFields,
    ) -> Result<Option<MenuItem>, AppError> {
        let sql = format!(
            "UPDATE menu_items SET title = ?, description = ?, icon = ?, url = ?, component = ?, \
             sort_order = ?, active = ?, external = ?, requires_auth = ?, min_level = ?, permissions = ?, \
             parent_id = ?, updated_at = ? WHERE id = ? RETURNING {}",
            COLUMNS
        );

        Ok(sqlx::query_as::<_, MenuItem>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(&fields.icon)
            .bind(&fields.url)
            .bind(&fields.component)
            .bind(fields.sort_order)
            .bind(fields.active)
            .bind(fields.external)
            .bind(fields.requires_auth)
            .bind(fields.min_level)
            .bind(fields.permissions.as_ref().map(Json))
            .bind(fields.parent_id)
            .bind(now_rfc3339())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Apply a bulk reorder. Either every entry is applied or none is.
    pub async fn reorder_menu_items(&self, entries: &[MenuOrderEntry]) -> Result<(), AppError> {
        let now = now_rfc3339();
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            let result = sqlx::query("UPDATE menu_items SET sort_order = ?, updated_at = ? WHERE id = ?")
                .bind(entry.sort_order)
                .bind(&now)
                .bind(entry.id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(AppError::NotFound(format!("Menu item {}", entry.id)));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_menu_item(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
