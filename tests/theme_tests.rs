// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Theme routes, default switching and CSS rendering.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{send, ADMIN_EMAIL, GERENTE_EMAIL};

#[tokio::test]
async fn test_default_theme_is_public() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/temas/padrao", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Tema Claro Padrão");
    assert_eq!(body["padrao"], true);
}

#[tokio::test]
async fn test_default_theme_css() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/temas/padrao/css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/css"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let css = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(css.starts_with(":root {"));
    assert!(css.contains("--cor-primaria: #0284c7;"));
}

#[tokio::test]
async fn test_list_and_admin_listing() {
    let (app, _) = common::create_test_app().await;

    let token = common::token_for(&app, GERENTE_EMAIL).await;
    let (status, body) = send(&app, Method::GET, "/api/temas", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::GET, "/api/temas/admin", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = common::token_for(&app, ADMIN_EMAIL).await;
    let (status, body) = send(&app, Method::GET, "/api/temas/admin", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().all(|t| t.get("usuario").is_some()));
}

#[tokio::test]
async fn test_create_theme() {
    let (app, _) = common::create_test_app().await;
    let token = common::token_for(&app, ADMIN_EMAIL).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/temas",
        Some(&token),
        Some(json!({ "nome": "Corporativo", "cor_primaria": "#112233" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cor_primaria"], "#112233");
    assert_eq!(body["cor_secundaria"], "#0d9488");
    assert_eq!(body["fonte_principal"], "Inter");
    assert_eq!(body["padrao"], false);
    assert_eq!(body["personalizado"], true);
    assert!(body["usuario_id"].is_i64());

    let id = body["id"].as_i64().unwrap();
    let (status, body) = send(&app, Method::GET, &format!("/api/temas/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["email"], ADMIN_EMAIL);

    // Duplicate name
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/temas",
        Some(&token),
        Some(json!({ "nome": "Corporativo" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Bad colour
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/temas",
        Some(&token),
        Some(json!({ "nome": "Errado", "cor_primaria": "azul" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, Method::POST, "/api/temas", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_new_default_replaces_previous() {
    let (app, state) = common::create_test_app().await;
    let token = common::token_for(&app, ADMIN_EMAIL).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/temas",
        Some(&token),
        Some(json!({ "nome": "Novo Padrão", "padrao": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let new_id = body["id"].as_i64().unwrap();

    let (_, body) = send(&app, Method::GET, "/api/temas/padrao", None, None).await;
    assert_eq!(body["id"], new_id);

    let defaults = state
        .db
        .list_active_themes()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.is_default)
        .count();
    assert_eq!(defaults, 1);
}

#[tokio::test]
async fn test_set_default_and_delete() {
    let (app, state) = common::create_test_app().await;
    let token = common::token_for(&app, ADMIN_EMAIL).await;

    let dark = state
        .db
        .get_theme_by_name("Tema Escuro Padrão")
        .await
        .unwrap()
        .unwrap();
    let light = state
        .db
        .get_theme_by_name("Tema Claro Padrão")
        .await
        .unwrap()
        .unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/api/temas/{}", light.id), Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/temas/{}/padrao", dark.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tema_id"], dark.id);

    let (_, body) = send(&app, Method::GET, "/api/temas/padrao", None, None).await;
    assert_eq!(body["id"], dark.id);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/temas/{}", light.id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::PUT, "/api/temas/9999/padrao", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inactive_theme_cannot_be_default() {
    let (app, state) = common::create_test_app().await;
    let token = common::token_for(&app, ADMIN_EMAIL).await;
    let green = state.db.get_theme_by_name("Tema Verde").await.unwrap().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/temas/{}", green.id),
        Some(&token),
        Some(json!({ "nome": "Tema Verde", "ativo": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ativo"], false);
    assert_eq!(body["cor_primaria"], "#10b981");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/temas/{}/padrao", green.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename_collision() {
    let (app, state) = common::create_test_app().await;
    let token = common::token_for(&app, ADMIN_EMAIL).await;
    let green = state.db.get_theme_by_name("Tema Verde").await.unwrap().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/temas/{}", green.id),
        Some(&token),
        Some(json!({ "nome": "Tema Escuro Padrão" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/temas/9999",
        Some(&token),
        Some(json!({ "nome": "Qualquer" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
