// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dynamic menu routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;
use crate::models::{build_menu_tree, MenuItem, MenuItemDetail, MenuItemInput, MenuNode, MenuOrderEntry};
use crate::AppState;

/// Menu routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/menu", get(list_menu).post(create_item))
        .route("/api/menu/admin", get(list_menu_admin))
        .route("/api/menu/nivel/{nivel_id}", get(menu_for_level))
        .route("/api/menu/ordem/atualizar", put(reorder_items))
        .route(
            "/api/menu/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

// ─── Queries ─────────────────────────────────────────────────

async fn list_menu(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MenuNode>>> {
    let items = state.db.list_active_menu_items().await?;
    Ok(Json(build_menu_tree(items)))
}

async fn list_menu_admin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<MenuItem>>> {
    user.require_admin()?;
    Ok(Json(state.db.list_all_menu_items().await?))
}

/// Tree of items visible to an access level.
async fn menu_for_level(
    State(state): State<Arc<AppState>>,
    ApiPath(level_id): ApiPath<i64>,
) -> Result<Json<Vec<MenuNode>>> {
    if state.db.get_access_level(level_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Access level {}", level_id)));
    }

    let items = state.db.list_menu_items_for_level(level_id).await?;
    Ok(Json(build_menu_tree(items)))
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MenuItemDetail>> {
    let item = find_item(&state, id).await?;

    let parent = match item.parent_id {
        Some(parent_id) => state.db.get_menu_item(parent_id).await?,
        None => None,
    };
    let children = state.db.list_menu_children(id).await?;

    Ok(Json(MenuItemDetail {
        item,
        parent,
        children,
    }))
}

async fn find_item(state: &AppState, id: i64) -> Result<MenuItem> {
    state
        .db
        .get_menu_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {}", id)))
}

// ─── Mutations ───────────────────────────────────────────────

async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<MenuItemInput>,
) -> Result<(StatusCode, Json<MenuItem>)> {
    user.require_admin()?;
    input.validate()?;

    if let Some(parent_id) = input.parent_id {
        if state.db.get_menu_item(parent_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Parent menu item {} does not exist",
                parent_id
            )));
        }
    }

    let item = state.db.create_menu_item(&input.into_fields(None)).await?;
    tracing::info!(menu_item_id = item.id, user_id = user.id, "Menu item created");

    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<MenuItemInput>,
) -> Result<Json<MenuItem>> {
    user.require_admin()?;
    let existing = find_item(&state, id).await?;
    input.validate()?;

    if let Some(parent_id) = input.parent_id {
        if parent_id == id {
            return Err(AppError::BadRequest(
                "A menu item cannot be its own parent".to_string(),
            ));
        }
        if state.db.get_menu_item(parent_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Parent menu item {} does not exist",
                parent_id
            )));
        }
        if state.db.menu_ancestor_ids(parent_id).await?.contains(&id) {
            return Err(AppError::BadRequest(
                "A menu item cannot be moved under one of its descendants".to_string(),
            ));
        }
    }

    let fields = input.into_fields(Some(&existing));
    let item = state
        .db
        .update_menu_item(id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {}", id)))?;

    tracing::info!(menu_item_id = id, user_id = user.id, "Menu item updated");
    Ok(Json(item))
}

#[derive(Deserialize)]
struct ReorderRequest {
    #[serde(default)]
    itens: Option<Vec<MenuOrderEntry>>,
}

#[derive(Serialize)]
struct ReorderResponse {
    mensagem: String,
    itens: usize,
}

async fn reorder_items(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(req): ApiJson<ReorderRequest>,
) -> Result<Json<ReorderResponse>> {
    user.require_admin()?;
    let entries = req
        .itens
        .ok_or_else(|| AppError::BadRequest("Field 'itens' must be a list".to_string()))?;

    state.db.reorder_menu_items(&entries).await?;
    tracing::info!(count = entries.len(), user_id = user.id, "Menu reordered");

    Ok(Json(ReorderResponse {
        mensagem: "Menu order updated".to_string(),
        itens: entries.len(),
    }))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    user.require_admin()?;
    find_item(&state, id).await?;

    let children = state.db.count_menu_children(id).await?;
    if children > 0 {
        return Err(AppError::BadRequestWithDetails {
            message: "Menu item has children; remove or move them first".to_string(),
            details: json!({ "filhos": children }),
        });
    }

    state.db.delete_menu_item(id).await?;
    tracing::info!(menu_item_id = id, user_id = user.id, "Menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}
