// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Theme routes.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::models::{Theme, ThemeDetail, ThemeInput};
use crate::AppState;

/// Routes reachable without a token (the login page needs the theme).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/temas/padrao", get(default_theme))
        .route("/api/temas/padrao/css", get(default_theme_css))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/temas", get(list_themes).post(create_theme))
        .route("/api/temas/admin", get(list_themes_admin))
        .route(
            "/api/temas/{id}",
            get(get_theme).put(update_theme).delete(delete_theme),
        )
        .route("/api/temas/{id}/padrao", put(set_default))
}

async fn list_themes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Theme>>> {
    Ok(Json(state.db.list_active_themes().await?))
}

async fn list_themes_admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ThemeDetail>>> {
    user.require_admin()?;
    Ok(Json(state.db.list_themes_with_owner().await?))
}

async fn find_default(state: &AppState) -> Result<Theme> {
    state
        .db
        .get_default_theme()
        .await?
        .ok_or_else(|| AppError::NotFound("No active theme".to_string()))
}

async fn default_theme(State(state): State<Arc<AppState>>) -> Result<Json<Theme>> {
    Ok(Json(find_default(&state).await?))
}

async fn default_theme_css(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let theme = find_default(&state).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        theme.to_css(),
    ))
}

async fn get_theme(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ThemeDetail>> {
    let theme = find_theme(&state, id).await?;
    let owner = match theme.user_id {
        Some(user_id) => state.db.get_user_summary(user_id).await?,
        None => None,
    };
    Ok(Json(ThemeDetail { theme, owner }))
}

async fn find_theme(state: &AppState, id: i64) -> Result<Theme> {
    state
        .db
        .get_theme(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Theme {}", id)))
}

async fn create_theme(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(mut input): ApiJson<ThemeInput>,
) -> Result<(StatusCode, Json<Theme>)> {
    user.require_admin()?;
    input.validate()?;

    let name = input.name.as_deref().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if state.db.get_theme_by_name(name).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "A theme named '{}' already exists",
            name
        )));
    }

    input.user_id = Some(user.id);
    let theme = state.db.create_theme(&input.into_fields(None)).await?;
    tracing::info!(theme_id = theme.id, user_id = user.id, default = theme.is_default, "Theme created");

    Ok((StatusCode::CREATED, Json(theme)))
}

async fn update_theme(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ThemeInput>,
) -> Result<Json<Theme>> {
    user.require_admin()?;
    let existing = find_theme(&state, id).await?;
    input.validate()?;

    let name = input.name.as_deref().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if name != existing.name {
        if let Some(other) = state.db.get_theme_by_name(name).await? {
            if other.id != id {
                return Err(AppError::BadRequest(format!(
                    "A theme named '{}' already exists",
                    name
                )));
            }
        }
    }

    let fields = input.into_fields(Some(&existing));
    let theme = state
        .db
        .update_theme(id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Theme {}", id)))?;

    tracing::info!(theme_id = id, user_id = user.id, "Theme updated");
    Ok(Json(theme))
}

#[derive(Serialize)]
struct DefaultThemeResponse {
    mensagem: String,
    tema_id: i64,
}

async fn set_default(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DefaultThemeResponse>> {
    user.require_admin()?;
    let theme = find_theme(&state, id).await?;

    if !theme.active {
        return Err(AppError::BadRequest(
            "An inactive theme cannot be the default".to_string(),
        ));
    }

    state.db.set_default_theme(id).await?;
    tracing::info!(theme_id = id, user_id = user.id, "Default theme changed");

    Ok(Json(DefaultThemeResponse {
        mensagem: "Default theme updated".to_string(),
        tema_id: id,
    }))
}

async fn delete_theme(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    user.require_admin()?;
    let theme = find_theme(&state, id).await?;

    if theme.is_default {
        return Err(AppError::BadRequest(
            "The default theme cannot be deleted".to_string(),
        ));
    }

    state.db.delete_theme(id).await?;
    tracing::info!(theme_id = id, user_id = user.id, "Theme deleted");
    Ok(StatusCode::NO_CONTENT)
}
