// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, refresh-token rotation and logout.

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use controle_ti::services::hash_refresh_token;
use controle_ti::time_utils::format_utc_rfc3339;
use serde_json::json;

mod common;
use common::{send, ADMIN_EMAIL, ADMIN_PASSWORD, USER_PASSWORD};

#[tokio::test]
async fn test_login_returns_tokens_and_user() {
    let (app, _) = common::create_test_app().await;

    let body = common::login(&app, "  ADMIN@Sistema.com ", ADMIN_PASSWORD).await;

    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refreshToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["usuario"]["email"], ADMIN_EMAIL);
    assert_eq!(body["usuario"]["nivel_id"], 1);
    assert_eq!(body["usuario"]["permissoes"]["menu"]["excluir"], true);
    assert!(body["usuario"].get("senha").is_none());
}

#[tokio::test]
async fn test_login_rejections() {
    let (app, state) = common::create_test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ninguem@teste.com", "senha": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "senha": "errada" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::create_user(
        &state.db,
        &state.config,
        "Inativo",
        "inativo@teste.com",
        4,
        false,
    )
    .await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "inativo@teste.com", "senha": USER_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "account_disabled");
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let (app, state) = common::create_test_app().await;
    let login = common::login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let first = login["refreshToken"].as_str().unwrap().to_string();
    let user_id = login["usuario"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/refresh",
        None,
        Some(json!({ "refreshToken": first })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    let access = body["accessToken"].as_str().unwrap();
    let (status, _) = send(&app, Method::GET, "/api/auth/validate", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    // The consumed token is gone for good
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/refresh",
        None,
        Some(json!({ "refreshToken": first })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_refresh_token");

    assert_eq!(state.db.count_refresh_tokens(user_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_refresh_rejections() {
    let (app, state) = common::create_test_app().await;

    let (status, _) = send(&app, Method::POST, "/api/auth/refresh", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/refresh",
        None,
        Some(json!({ "refreshToken": "nao-existe" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Expired tokens are removed when presented
    let admin = state.db.get_user_by_email(ADMIN_EMAIL).await.unwrap().unwrap();
    let hash = hash_refresh_token("expirado");
    state
        .db
        .store_refresh_token(admin.id, &hash, "2000-01-01T00:00:00Z")
        .await
        .unwrap();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/refresh",
        None,
        Some(json!({ "refreshToken": "expirado" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(state.db.get_refresh_token(&hash).await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_removes_expired_refresh_tokens() {
    let (app, state) = common::create_test_app().await;
    let admin = state.db.get_user_by_email(ADMIN_EMAIL).await.unwrap().unwrap();
    let gerente = state
        .db
        .get_user_by_email(common::GERENTE_EMAIL)
        .await
        .unwrap()
        .unwrap();

    let yesterday = format_utc_rfc3339(Utc::now() - Duration::days(1));
    let tomorrow = format_utc_rfc3339(Utc::now() + Duration::days(1));
    state
        .db
        .store_refresh_token(admin.id, &hash_refresh_token("stale"), &yesterday)
        .await
        .unwrap();
    state
        .db
        .store_refresh_token(admin.id, &hash_refresh_token("still-valid"), &tomorrow)
        .await
        .unwrap();
    state
        .db
        .store_refresh_token(gerente.id, &hash_refresh_token("other-user"), &yesterday)
        .await
        .unwrap();

    common::login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert!(state.db.get_refresh_token(&hash_refresh_token("stale")).await.unwrap().is_none());
    assert!(state.db.get_refresh_token(&hash_refresh_token("still-valid")).await.unwrap().is_some());
    // Only the user logging in is cleaned up
    assert!(state.db.get_refresh_token(&hash_refresh_token("other-user")).await.unwrap().is_some());
    // The valid token plus the one issued by this login
    assert_eq!(state.db.count_refresh_tokens(admin.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_refresh_for_inactive_user_fails() {
    let (app, state) = common::create_test_app().await;
    let login = common::login(&app, common::TECNICO_EMAIL, USER_PASSWORD).await;
    let refresh = login["refreshToken"].as_str().unwrap();
    let user_id = login["usuario"]["id"].as_i64().unwrap();

    state.db.set_user_active(user_id, false).await.unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/refresh",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(state.db.count_refresh_tokens(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let (app, _) = common::create_test_app().await;
    let login = common::login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let refresh = login["refreshToken"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/logout",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/refresh",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logging out twice is harmless
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/logout",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::POST, "/api/auth/logout", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_returns_user() {
    let (app, _) = common::create_test_app().await;
    let token = common::token_for(&app, common::GERENTE_EMAIL).await;

    let (status, body) = send(&app, Method::GET, "/api/auth/validate", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["usuario"]["email"], common::GERENTE_EMAIL);
    assert_eq!(body["usuario"]["nivel"], "Gerente");
    assert_eq!(body["usuario"]["nivel_id"], 2);
}
