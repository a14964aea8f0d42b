// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dynamic menu items and the tree served to the sidebar.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A menu entry stored in `menu_items`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct MenuItem {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "icone")]
    pub icon: Option<String>,
    pub url: Option<String>,
    /// Frontend component name rendered for this entry
    #[serde(rename = "componente")]
    pub component: Option<String>,
    #[serde(rename = "ordem")]
    pub sort_order: i64,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "externo")]
    pub external: bool,
    #[serde(rename = "requer_auth")]
    pub requires_auth: bool,
    /// Least privileged access level (highest id) that may see this entry
    #[serde(rename = "nivel_min")]
    pub min_level: i64,
    #[serde(rename = "permissoes")]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub permissions: Option<Json<Value>>,
    #[serde(rename = "pai_id")]
    pub parent_id: Option<i64>,
    #[serde(rename = "criado_em")]
    pub created_at: String,
    #[serde(rename = "atualizado_em")]
    pub updated_at: String,
}

/// A menu item with its (recursively built) children.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct MenuNode {
    #[serde(flatten)]
    pub item: MenuItem,
    #[serde(rename = "filhos")]
    pub children: Vec<MenuNode>,
}

/// Single item lookup: the item with its parent and direct children.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemDetail {
    #[serde(flatten)]
    pub item: MenuItem,
    #[serde(rename = "pai")]
    pub parent: Option<MenuItem>,
    #[serde(rename = "filhos")]
    pub children: Vec<MenuItem>,
}

/// Create/update payload for a menu item.
///
/// On update, absent fields keep their stored value except `pai_id`,
/// where absence moves the item to the root.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MenuItemInput {
    #[serde(rename = "titulo", default)]
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 100, message = "Title is required")
    )]
    pub title: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "icone", default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "componente", default)]
    pub component: Option<String>,
    #[serde(rename = "ordem", default)]
    pub sort_order: Option<i64>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
    #[serde(rename = "externo", default)]
    pub external: Option<bool>,
    #[serde(rename = "requer_auth", default)]
    pub requires_auth: Option<bool>,
    #[serde(rename = "nivel_min", default)]
    #[validate(range(min = 1, message = "Minimum level must be at least 1"))]
    pub min_level: Option<i64>,
    #[serde(rename = "permissoes", default)]
    pub permissions: Option<Value>,
    #[serde(rename = "pai_id", default)]
    pub parent_id: Option<i64>,
}

impl MenuItemInput {
    /// Resolve the payload into a full row, filling absent fields from
    /// `existing` (update) or from the defaults (create).
    pub fn into_fields(self, existing: Option<&MenuItem>) -> MenuItemFields {
        MenuItemFields {
            title: self
                .title
                .map(|t| t.trim().to_string())
                .or_else(|| existing.map(|e| e.title.clone()))
                .unwrap_or_default(),
            description: self.description.or_else(|| existing.and_then(|e| e.description.clone())),
            icon: self.icon.or_else(|| existing.and_then(|e| e.icon.clone())),
            url: self.url.or_else(|| existing.and_then(|e| e.url.clone())),
            component: self.component.or_else(|| existing.and_then(|e| e.component.clone())),
            sort_order: self.sort_order.or(existing.map(|e| e.sort_order)).unwrap_or(0),
            active: self.active.or(existing.map(|e| e.active)).unwrap_or(true),
            external: self.external.or(existing.map(|e| e.external)).unwrap_or(false),
            requires_auth: self
                .requires_auth
                .or(existing.map(|e| e.requires_auth))
                .unwrap_or(true),
            min_level: self.min_level.or(existing.map(|e| e.min_level)).unwrap_or(1),
            permissions: self
                .permissions
                .or_else(|| existing.and_then(|e| e.permissions.as_ref().map(|p| p.0.clone()))),
            parent_id: self.parent_id,
        }
    }
}

/// Every writable column of a menu item.
#[derive(Debug, Clone)]
pub struct MenuItemFields {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
    pub component: Option<String>,
    pub sort_order: i64,
    pub active: bool,
    pub external: bool,
    pub requires_auth: bool,
    pub min_level: i64,
    pub permissions: Option<Value>,
    pub parent_id: Option<i64>,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuOrderEntry {
    pub id: i64,
    #[serde(rename = "ordem")]
    pub sort_order: i64,
}

/// Build a menu tree from a flat list.
///
/// Roots are items without a parent. Children are attached under their parent
/// at any depth, siblings are sorted by `ordem` then id. Items whose parent is
/// not in `items` are dropped, so filtering a parent out hides its subtree and
/// parent cycles can never be reached from a root.
pub fn build_menu_tree(items: Vec<MenuItem>) -> Vec<MenuNode> {
    let mut by_parent: HashMap<Option<i64>, Vec<MenuItem>> = HashMap::new();
    for item in items {
        by_parent.entry(item.parent_id).or_default().push(item);
    }

    fn attach(parent: Option<i64>, by_parent: &mut HashMap<Option<i64>, Vec<MenuItem>>) -> Vec<MenuNode> {
        let mut level = by_parent.remove(&parent).unwrap_or_default();
        level.sort_by_key(|item| (item.sort_order, item.id));
        level
            .into_iter()
            .map(|item| {
                let children = attach(Some(item.id), by_parent);
                MenuNode { item, children }
            })
            .collect()
    }

    attach(None, &mut by_parent)
}
