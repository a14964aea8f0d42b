// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod access_levels;
pub mod auth;
pub mod equipment_types;
pub mod menu;
pub mod settings;
pub mod status;
pub mod themes;

use crate::error::AppError;
use crate::middleware::{rate_limit, require_auth};
use crate::AppState;
use axum::http::{header, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// JSON 404 for unknown routes.
async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("Route not found: {}", uri.path())).into_response()
}

fn cors_layer(state: &AppState) -> CorsLayer {
    // Production only accepts the configured frontend; elsewhere any origin
    let origin = if state.config.is_production() {
        match HeaderValue::from_str(&state.config.frontend_url) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::error!(url = %state.config.frontend_url, "FRONTEND_URL is not a valid origin");
                AllowOrigin::list(std::iter::empty::<HeaderValue>())
            }
        }
    } else {
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(status::api_routes())
        .merge(auth::routes())
        .merge(themes::public_routes());

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(menu::routes())
        .merge(themes::routes())
        .merge(settings::routes())
        .merge(equipment_types::routes())
        .merge(access_levels::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Everything under /api is rate limited before authentication runs
    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .merge(status::routes())
        .merge(api_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors_layer(&state))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
