// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{is_unique_violation, Database};
use crate::error::AppError;
use crate::models::EquipmentType;
use crate::time_utils::now_rfc3339;

const COLUMNS: &str = "id, name, description, icon, color, active, created_at, updated_at";

fn name_taken() -> AppError {
    AppError::Conflict("An equipment type with this name already exists".to_string())
}

impl Database {
    // ─── Equipment Type Operations ───────────────────────────────

    pub async fn list_active_equipment_types(&self) -> Result<Vec<EquipmentType>, AppError> {
        let sql = format!(
            "SELECT {} FROM equipment_types WHERE active = 1 ORDER BY name COLLATE NOCASE",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, EquipmentType>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_equipment_type(&self, id: i64) -> Result<Option<EquipmentType>, AppError> {
        let sql = format!("SELECT {} FROM equipment_types WHERE id = ?", COLUMNS);
        Ok(sqlx::query_as::<_, EquipmentType>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Whether another type already uses `name`, ignoring case.
    pub async fn equipment_type_name_exists(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM equipment_types WHERE name = ? COLLATE NOCASE AND (? IS NULL OR id != ?)",
        )
        .bind(name)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn create_equipment_type(
        &self,
        name: &str,
        description: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> Result<EquipmentType, AppError> {
        let now = now_rfc3339();
        let sql = format!(
            "INSERT INTO equipment_types (name, description, icon, color, active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 1, ?, ?) RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, EquipmentType>(&sql)
            .bind(name)
            .bind(description)
            .bind(icon)
            .bind(color)
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| if is_unique_violation(&e) { name_taken() } else { e.into() })
    }

    /// Overwrite every column of an equipment type.
    pub async fn update_equipment_type(&self, equipment_type: &EquipmentType) -> Result<EquipmentType, AppError> {
        let sql = format!(
            "UPDATE equipment_types SET name = ?, description = ?, icon = ?, color = ?, active = ?, \
             updated_at = ? WHERE id = ? RETURNING {}",
            COLUMNS
        );

        sqlx::query_as::<_, EquipmentType>(&sql)
            .bind(&equipment_type.name)
            .bind(&equipment_type.description)
            .bind(&equipment_type.icon)
            .bind(&equipment_type.color)
            .bind(equipment_type.active)
            .bind(now_rfc3339())
            .bind(equipment_type.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| if is_unique_violation(&e) { name_taken() } else { e.into() })?
            .ok_or_else(|| AppError::NotFound(format!("Equipment type {}", equipment_type.id)))
    }

    pub async fn delete_equipment_type(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM equipment_types WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
