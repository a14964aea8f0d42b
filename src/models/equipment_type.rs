// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Equipment types ("tipos de equipamento").

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct EquipmentType {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "icone")]
    pub icon: Option<String>,
    #[serde(rename = "cor")]
    pub color: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "criado_em")]
    pub created_at: String,
    #[serde(rename = "atualizado_em")]
    pub updated_at: String,
}

/// Create/update payload. On update every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EquipmentTypeInput {
    #[serde(rename = "nome", default)]
    #[validate(length(min = 1, max = 100, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "icone", default)]
    pub icon: Option<String>,
    #[serde(rename = "cor", default)]
    pub color: Option<String>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
}

impl EquipmentTypeInput {
    /// Trimmed name, `None` when absent or blank.
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_name() {
        let input: EquipmentTypeInput =
            serde_json::from_value(serde_json::json!({"nome": "  Notebook "})).unwrap();
        assert_eq!(input.trimmed_name(), Some("Notebook"));

        let blank = EquipmentTypeInput {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.trimmed_name(), None);
        assert_eq!(EquipmentTypeInput::default().trimmed_name(), None);
    }
}
