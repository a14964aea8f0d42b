// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health and status endpoints.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::now_rfc3339;
use crate::AppState;

/// Liveness probe, outside the rate-limited `/api` tree.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api", get(api_root))
        .route("/api/status", get(api_status))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub environment: String,
}

async fn api_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        timestamp: now_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.as_str().to_string(),
    })
}

#[derive(Serialize)]
pub struct ApiRootResponse {
    pub mensagem: String,
    pub versao: String,
    pub data: String,
    pub status: String,
}

async fn api_root() -> Json<ApiRootResponse> {
    Json(ApiRootResponse {
        mensagem: "API Controle de TI".to_string(),
        versao: env!("CARGO_PKG_VERSION").to_string(),
        data: now_rfc3339(),
        status: "online".to_string(),
    })
}
