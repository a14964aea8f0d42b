// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Equipment type routes (`/api/tipos-equipamento`).

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::models::{EquipmentType, EquipmentTypeInput};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/tipos-equipamento",
            get(list_types).post(create_type),
        )
        .route(
            "/api/tipos-equipamento/{id}",
            get(get_type).put(update_type).delete(delete_type),
        )
}

async fn list_types(State(state): State<Arc<AppState>>) -> Result<Json<Vec<EquipmentType>>> {
    Ok(Json(state.db.list_active_equipment_types().await?))
}

async fn find_type(state: &AppState, id: i64) -> Result<EquipmentType> {
    state
        .db
        .get_equipment_type(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment type {}", id)))
}

async fn get_type(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<EquipmentType>> {
    Ok(Json(find_type(&state, id).await?))
}

fn name_conflict(name: &str) -> AppError {
    AppError::Conflict(format!("An equipment type named '{}' already exists", name))
}

async fn create_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<EquipmentTypeInput>,
) -> Result<(StatusCode, Json<EquipmentType>)> {
    user.require_permission("equipamentos.criar")?;
    input.validate()?;

    let name = input
        .trimmed_name()
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;
    if state.db.equipment_type_name_exists(name, None).await? {
        return Err(name_conflict(name));
    }

    let equipment_type = state
        .db
        .create_equipment_type(
            name,
            input.description.as_deref().unwrap_or_default(),
            input.icon.as_deref(),
            input.color.as_deref(),
        )
        .await?;
    tracing::info!(equipment_type_id = equipment_type.id, user_id = user.id, "Equipment type created");

    Ok((StatusCode::CREATED, Json(equipment_type)))
}

async fn update_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<EquipmentTypeInput>,
) -> Result<Json<EquipmentType>> {
    user.require_permission("equipamentos.atualizar")?;
    let mut equipment_type = find_type(&state, id).await?;
    input.validate()?;

    if input.name.is_some() {
        let name = input
            .trimmed_name()
            .ok_or_else(|| AppError::BadRequest("Name cannot be empty".to_string()))?;
        if state.db.equipment_type_name_exists(name, Some(id)).await? {
            return Err(name_conflict(name));
        }
        equipment_type.name = name.to_string();
    }
    if let Some(description) = input.description {
        equipment_type.description = description;
    }
    if input.icon.is_some() {
        equipment_type.icon = input.icon;
    }
    if input.color.is_some() {
        equipment_type.color = input.color;
    }
    if let Some(active) = input.active {
        equipment_type.active = active;
    }

    let updated = state.db.update_equipment_type(&equipment_type).await?;
    tracing::info!(equipment_type_id = id, user_id = user.id, "Equipment type updated");
    Ok(Json(updated))
}

#[derive(Serialize)]
struct DeleteResponse {
    message: String,
    id: i64,
}

async fn delete_type(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>> {
    user.require_permission("equipamentos.excluir")?;

    if !state.db.delete_equipment_type(id).await? {
        return Err(AppError::NotFound(format!("Equipment type {}", id)));
    }
    tracing::info!(equipment_type_id = id, user_id = user.id, "Equipment type deleted");

    Ok(Json(DeleteResponse {
        message: "Equipment type deleted".to_string(),
        id,
    }))
}
