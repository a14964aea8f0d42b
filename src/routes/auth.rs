// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, refresh-token rotation and logout.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::services::password::verify_password;
use crate::services::tokens::{create_access_token, hash_refresh_token, issue_refresh_token};
use crate::time_utils::is_past;
use crate::AppState;

/// Public auth routes. `/api/auth/validate` sits behind the auth middleware
/// and is registered in `protected_routes`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/validate", axum::routing::get(validate))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    senha: Option<String>,
}

/// User fields returned alongside the tokens.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct LoginUser {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub cargo: Option<String>,
    pub nivel_id: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub permissoes: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub usuario: LoginUser,
}

async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (req.email, req.senha) else {
        return Err(AppError::BadRequest("Email and password are required".to_string()));
    };
    let email = email.trim().to_lowercase();

    let Some(user) = state.db.get_user_by_email(&email).await? else {
        tracing::warn!(email = %email, "Login attempt for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !user.active {
        tracing::warn!(user_id = user.id, "Login attempt for disabled account");
        return Err(AppError::AccountDisabled);
    }

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let purged = state.db.purge_expired_refresh_tokens(Some(user.id)).await?;
    if purged > 0 {
        tracing::debug!(user_id = user.id, purged, "Removed expired refresh tokens");
    }

    let (access_token, refresh_token) = issue_tokens(&state, &user).await?;

    let permissions = state
        .db
        .get_access_level(user.access_level_id)
        .await?
        .and_then(|level| level.permissions)
        .map(|p| p.0);

    tracing::info!(user_id = user.id, "Login successful");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        usuario: LoginUser {
            id: user.id,
            nome: user.name,
            email: user.email,
            cargo: user.job_title,
            nivel_id: user.access_level_id,
            permissoes: permissions,
        },
    }))
}

/// Create an access token and store a new refresh token for `user`.
async fn issue_tokens(state: &AppState, user: &User) -> Result<(String, String)> {
    let access_token = create_access_token(
        user,
        &state.config.jwt_signing_key,
        state.config.access_token_ttl_minutes,
    )?;

    let refresh = issue_refresh_token(state.config.refresh_token_ttl_days)?;
    state
        .db
        .store_refresh_token(user.id, &refresh.hash, &refresh.expires_at)
        .await?;

    Ok((access_token, refresh.token))
}

// ─── Refresh & Logout ────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

impl RefreshRequest {
    fn token(self) -> Result<String> {
        self.refresh_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Refresh token not provided".to_string()))
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Exchange a refresh token for a new token pair. The presented token is
/// consumed, so each refresh token works exactly once.
async fn refresh(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    let presented = req.token()?;
    let presented_hash = hash_refresh_token(&presented);

    let Some(stored) = state.db.get_refresh_token(&presented_hash).await? else {
        tracing::warn!("Refresh attempted with unknown token");
        return Err(AppError::InvalidRefreshToken);
    };

    if is_past(&stored.expires_at) {
        state.db.delete_refresh_token(&presented_hash).await?;
        tracing::info!(user_id = stored.user_id, "Expired refresh token removed");
        return Err(AppError::InvalidRefreshToken);
    }

    let user = match state.db.get_user(stored.user_id).await? {
        Some(user) if user.active => user,
        _ => {
            state.db.delete_refresh_token(&presented_hash).await?;
            tracing::warn!(user_id = stored.user_id, "Refresh for missing or inactive user");
            return Err(AppError::InvalidRefreshToken);
        }
    };

    let access_token = create_access_token(
        &user,
        &state.config.jwt_signing_key,
        state.config.access_token_ttl_minutes,
    )?;
    let next = issue_refresh_token(state.config.refresh_token_ttl_days)?;

    let rotated = state
        .db
        .rotate_refresh_token(&presented_hash, &next.hash, user.id, &next.expires_at)
        .await?;
    if !rotated {
        tracing::warn!(user_id = user.id, "Refresh token reused during rotation");
        return Err(AppError::InvalidRefreshToken);
    }

    tracing::debug!(user_id = user.id, "Refresh token rotated");

    Ok(Json(TokenPair {
        access_token,
        refresh_token: next.token,
    }))
}

/// Revoke a refresh token. Unknown tokens are accepted silently.
async fn logout(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<StatusCode> {
    let token = req.token()?;
    let removed = state.db.delete_refresh_token(&hash_refresh_token(&token)).await?;
    tracing::info!(revoked = removed, "Logout");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Validation ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub usuario: AuthUser,
}

async fn validate(axum::Extension(user): axum::Extension<AuthUser>) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        valid: true,
        usuario: user,
    })
}
