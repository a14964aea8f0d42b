// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::models::{AccessLevel, AccessLevelInput};
use crate::AppState;

/// Access level routes (`/api/niveis-acesso`).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/niveis-acesso", get(list_levels).post(create_level))
        .route(
            "/api/niveis-acesso/{id}",
            get(get_level).put(update_level).delete(delete_level),
        )
}

async fn list_levels(State(state): State<Arc<AppState>>) -> Result<Json<Vec<AccessLevel>>> {
    Ok(Json(state.db.list_access_levels().await?))
}

async fn get_level(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AccessLevel>> {
    state
        .db
        .get_access_level(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Access level {}", id)))
}

fn required_name(input: &AccessLevelInput) -> Result<&str> {
    input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))
}

async fn create_level(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<AccessLevelInput>,
) -> Result<(StatusCode, Json<AccessLevel>)> {
    user.require_admin()?;
    input.validate()?;
    let name = required_name(&input)?;

    let level = state
        .db
        .create_access_level(name, input.description.as_deref(), input.permissions.as_ref())
        .await?;
    tracing::info!(level_id = level.id, user_id = user.id, "Access level created");

    Ok((StatusCode::CREATED, Json(level)))
}

async fn update_level(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<AccessLevelInput>,
) -> Result<Json<AccessLevel>> {
    user.require_admin()?;
    let existing = state
        .db
        .get_access_level(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Access level {}", id)))?;
    input.validate()?;
    let name = required_name(&input)?;

    let description = input.description.as_deref().or(existing.description.as_deref());
    let permissions = input
        .permissions
        .as_ref()
        .or(existing.permissions.as_ref().map(|p| &p.0));

    let level = state
        .db
        .update_access_level(id, name, description, permissions)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Access level {}", id)))?;

    tracing::info!(level_id = id, user_id = user.id, "Access level updated");
    Ok(Json(level))
}

async fn delete_level(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    user.require_admin()?;

    if state.db.get_access_level(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Access level {}", id)));
    }

    let users = state.db.count_users_with_access_level(id).await?;
    if users > 0 {
        return Err(AppError::BadRequestWithDetails {
            message: "Access level is assigned to users".to_string(),
            details: json!({ "usuarios": users }),
        });
    }

    state.db.delete_access_level(id).await?;
    tracing::info!(level_id = id, user_id = user.id, "Access level deleted");
    Ok(StatusCode::NO_CONTENT)
}
