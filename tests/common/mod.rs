// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use controle_ti::config::Config;
use controle_ti::db::Database;
use controle_ti::models::NewUser;
use controle_ti::routes::create_router;
use controle_ti::services::{hash_password, seed_defaults};
use controle_ti::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@sistema.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const GERENTE_EMAIL: &str = "gerente@teste.com";
pub const TECNICO_EMAIL: &str = "tecnico@teste.com";
pub const USUARIO_EMAIL: &str = "usuario@teste.com";
pub const USER_PASSWORD: &str = "senha123";

/// Seeded in-memory database with one user per access level.
#[allow(dead_code)]
pub async fn test_db(config: &Config) -> Database {
    let db = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    db.migrate().await.expect("Failed to create schema");
    seed_defaults(&db, ADMIN_PASSWORD, config.bcrypt_cost)
        .await
        .expect("Failed to seed defaults");

    for (name, email, level) in [
        ("Gerente Teste", GERENTE_EMAIL, 2),
        ("Técnico Teste", TECNICO_EMAIL, 3),
        ("Usuário Teste", USUARIO_EMAIL, 4),
    ] {
        create_user(&db, config, name, email, level, true).await;
    }

    db
}

#[allow(dead_code)]
pub async fn create_user(
    db: &Database,
    config: &Config,
    name: &str,
    email: &str,
    level: i64,
    active: bool,
) -> i64 {
    let password_hash = hash_password(USER_PASSWORD.to_string(), config.bcrypt_cost)
        .await
        .unwrap();
    db.create_user(&NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
        job_title: None,
        access_level_id: level,
        active,
    })
    .await
    .unwrap()
    .id
}

/// Create a test app backed by a seeded in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default()).await
}

#[allow(dead_code)]
pub async fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let db = test_db(&config).await;
    let state = Arc::new(AppState::new(config, db));
    (create_router(state.clone()), state)
}

/// Send a request and return the status and the JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Log in and return the full login response.
#[allow(dead_code)]
pub async fn login(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "senha": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);
    body
}

/// Access token for one of the seeded users.
#[allow(dead_code)]
pub async fn token_for(app: &Router, email: &str) -> String {
    let password = if email == ADMIN_EMAIL {
        ADMIN_PASSWORD
    } else {
        USER_PASSWORD
    };
    login(app, email, password).await["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}
