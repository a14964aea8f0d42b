// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access levels (roles) and their permission documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Id of the most privileged level ("Administrador").
///
/// Lower ids are more privileged: a menu item with `nivel_min = 3` is visible
/// to levels 1, 2 and 3.
pub const ADMIN_LEVEL_ID: i64 = 1;

/// Access level stored in `access_levels`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AccessLevel {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "permissoes")]
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "Record<string, Record<string, boolean>> | null")
    )]
    pub permissions: Option<Json<Value>>,
    #[serde(rename = "criado_em")]
    pub created_at: String,
    #[serde(rename = "atualizado_em")]
    pub updated_at: String,
}

/// Create/update payload for an access level.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AccessLevelInput {
    #[serde(rename = "nome", default)]
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 100, message = "Name is required")
    )]
    pub name: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "permissoes", default)]
    pub permissions: Option<Value>,
}

/// Check a `resource.action` permission against a permission document.
///
/// Two shapes are accepted: the nested object used by the seeds
/// (`{"menu": {"criar": true}}`) and a flat list of permission strings.
pub fn permission_granted(permissions: Option<&Value>, permission: &str) -> bool {
    let Some(permissions) = permissions else {
        return false;
    };

    match permissions {
        Value::Array(list) => list.iter().any(|p| p.as_str() == Some(permission)),
        Value::Object(_) => {
            let Some((resource, action)) = permission.split_once('.') else {
                return false;
            };
            permissions
                .get(resource)
                .and_then(|r| r.get(action))
                .and_then(Value::as_bool)
                .unwrap_or(false)
        }
        _ => false,
    }
}
