// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! System configuration routes (`/api/configuracoes`).

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

use crate::db::{SettingChanges, SettingFilter};
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::models::{group_settings, NewSetting, Setting, SettingDetail, SettingKind, SettingUpdate};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/configuracoes", get(list_settings).post(create_setting))
        .route("/api/configuracoes/admin", get(list_settings_admin))
        .route("/api/configuracoes/grupo/{grupo}", get(list_group))
        .route("/api/configuracoes/chave/{chave}", get(get_by_key))
        .route(
            "/api/configuracoes/{id}",
            axum::routing::put(update_setting).delete(delete_setting),
        )
}

type Grouped<T> = BTreeMap<String, Vec<T>>;

/// Visible settings grouped by `grupo`. Restricted ones only for admins.
async fn list_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Grouped<Setting>>> {
    let settings = state
        .db
        .list_settings(SettingFilter {
            group: None,
            include_hidden: false,
            include_restricted: user.is_admin(),
        })
        .await?;
    Ok(Json(group_settings(settings, |s| s.group.as_str())))
}

async fn list_settings_admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Grouped<SettingDetail>>> {
    user.require_admin()?;
    let settings = state.db.list_settings_with_editor().await?;
    Ok(Json(group_settings(settings, |s| s.setting.group.as_str())))
}

async fn list_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(group): ApiPath<String>,
) -> Result<Json<Vec<Setting>>> {
    let settings = state
        .db
        .list_settings(SettingFilter {
            group: Some(&group),
            include_hidden: false,
            include_restricted: user.is_admin(),
        })
        .await?;
    Ok(Json(settings))
}

fn check_restricted(user: &AuthUser, setting: &Setting) -> Result<()> {
    if setting.restricted && !user.is_admin() {
        tracing::warn!(user_id = user.id, key = %setting.key, "Restricted setting access denied");
        return Err(AppError::Forbidden(
            "This setting is restricted to administrators".to_string(),
        ));
    }
    Ok(())
}

async fn get_by_key(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<Setting>> {
    let setting = state
        .db
        .get_setting_by_key(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Setting '{}'", key)))?;
    check_restricted(&user, &setting)?;
    Ok(Json(setting))
}

async fn create_setting(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<NewSetting>,
) -> Result<(StatusCode, Json<Setting>)> {
    user.require_admin()?;
    input.validate()?;

    let fields = input.into_fields(Some(user.id)).map_err(AppError::BadRequest)?;
    let setting = state.db.create_setting(&fields).await?;
    tracing::info!(setting_id = setting.id, key = %setting.key, user_id = user.id, "Setting created");

    Ok((StatusCode::CREATED, Json(setting)))
}

async fn update_setting(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<SettingUpdate>,
) -> Result<Json<Setting>> {
    let existing = state
        .db
        .get_setting(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Setting {}", id)))?;
    check_restricted(&user, &existing)?;

    if let Some(value) = &update.value {
        let kind: SettingKind = existing.kind.parse().unwrap_or(SettingKind::Text);
        kind.validate_value(value).map_err(AppError::BadRequest)?;
    }

    let is_admin = user.is_admin();
    let changes = SettingChanges {
        value: update.value,
        description: update.description,
        visible: update.visible.filter(|_| is_admin),
        sort_order: update.sort_order.filter(|_| is_admin),
    };

    let setting = state
        .db
        .update_setting(id, &changes, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Setting {}", id)))?;

    tracing::info!(setting_id = id, key = %setting.key, user_id = user.id, "Setting updated");
    Ok(Json(setting))
}

#[derive(Serialize)]
struct DeleteResponse {
    mensagem: String,
}

async fn delete_setting(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<DeleteResponse>> {
    user.require_admin()?;

    if !state.db.delete_setting(id).await? {
        return Err(AppError::NotFound(format!("Setting {}", id)));
    }
    tracing::info!(setting_id = id, user_id = user.id, "Setting deleted");

    Ok(Json(DeleteResponse {
        mensagem: "Setting removed".to_string(),
    }))
}
