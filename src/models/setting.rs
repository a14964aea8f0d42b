// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! System settings ("configurações") stored as typed key/value pairs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::models::theme::validate_hex_color;
use crate::models::UserSummary;

/// Declared type of a setting value. Values are always stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Text,
    Number,
    Boolean,
    Json,
    Color,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Text => "text",
            SettingKind::Number => "number",
            SettingKind::Boolean => "boolean",
            SettingKind::Json => "json",
            SettingKind::Color => "color",
        }
    }

    /// Check that `value` is a valid textual encoding for this kind.
    pub fn validate_value(&self, value: &str) -> Result<(), String> {
        let ok = match self {
            SettingKind::Text => true,
            SettingKind::Number => value.trim().parse::<f64>().is_ok_and(f64::is_finite),
            SettingKind::Boolean => matches!(value, "true" | "false"),
            SettingKind::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
            SettingKind::Color => validate_hex_color(value).is_ok(),
        };

        if ok {
            Ok(())
        } else {
            Err(format!("Value '{}' is not a valid {}", value, self.as_str()))
        }
    }
}

impl FromStr for SettingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SettingKind::Text),
            "number" => Ok(SettingKind::Number),
            "boolean" => Ok(SettingKind::Boolean),
            "json" => Ok(SettingKind::Json),
            "color" => Ok(SettingKind::Color),
            other => Err(format!(
                "Invalid type '{}', expected one of text, number, boolean, json, color",
                other
            )),
        }
    }
}

/// A setting stored in `settings`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct Setting {
    pub id: i64,
    #[serde(rename = "chave")]
    pub key: String,
    #[serde(rename = "valor")]
    pub value: String,
    #[serde(rename = "grupo")]
    #[sqlx(rename = "group_name")]
    pub group: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "visivel")]
    pub visible: bool,
    /// Only administrators may read or change restricted settings
    #[serde(rename = "restrito")]
    pub restricted: bool,
    #[serde(rename = "ordem")]
    pub sort_order: i64,
    /// Last user to change the setting
    #[serde(rename = "usuario_id")]
    pub user_id: Option<i64>,
    #[serde(rename = "criado_em")]
    pub created_at: String,
    #[serde(rename = "atualizado_em")]
    pub updated_at: String,
}

/// Setting with the last editor resolved, for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct SettingDetail {
    #[serde(flatten)]
    pub setting: Setting,
    #[serde(rename = "atualizado_por")]
    pub updated_by: Option<UserSummary>,
}

/// Group settings by name, keeping the input order inside each group.
pub fn group_settings<T>(settings: Vec<T>, group_of: impl Fn(&T) -> &str) -> BTreeMap<String, Vec<T>> {
    let mut grouped: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for setting in settings {
        grouped
            .entry(group_of(&setting).to_string())
            .or_default()
            .push(setting);
    }
    grouped
}

/// Payload for creating a setting.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewSetting {
    #[serde(rename = "chave", default)]
    #[validate(
        required(message = "Key is required"),
        length(min = 1, max = 100, message = "Key is required")
    )]
    pub key: Option<String>,
    #[serde(rename = "valor", default)]
    #[validate(required(message = "Value is required"))]
    pub value: Option<String>,
    #[serde(rename = "grupo", default)]
    #[validate(
        required(message = "Group is required"),
        length(min = 1, max = 50, message = "Group is required")
    )]
    pub group: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "tipo", default)]
    #[validate(required(message = "Type is required"))]
    pub kind: Option<String>,
    #[serde(rename = "visivel", default)]
    pub visible: Option<bool>,
    #[serde(rename = "restrito", default)]
    pub restricted: Option<bool>,
    #[serde(rename = "ordem", default)]
    pub sort_order: Option<i64>,
}

impl NewSetting {
    /// Check the declared type and the value against it, producing the row
    /// to insert. Call after `validate()`.
    pub fn into_fields(self, user_id: Option<i64>) -> Result<SettingFields, String> {
        let kind: SettingKind = self.kind.as_deref().unwrap_or("text").parse()?;
        let value = self.value.unwrap_or_default();
        kind.validate_value(&value)?;

        Ok(SettingFields {
            key: self.key.unwrap_or_default().trim().to_string(),
            value,
            group: self.group.unwrap_or_default().trim().to_string(),
            description: self.description,
            kind,
            visible: self.visible.unwrap_or(true),
            restricted: self.restricted.unwrap_or(false),
            sort_order: self.sort_order.unwrap_or(0),
            user_id,
        })
    }
}

/// Every writable column of a setting.
#[derive(Debug, Clone)]
pub struct SettingFields {
    pub key: String,
    pub value: String,
    pub group: String,
    pub description: Option<String>,
    pub kind: SettingKind,
    pub visible: bool,
    pub restricted: bool,
    pub sort_order: i64,
    pub user_id: Option<i64>,
}

/// Partial update of a setting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingUpdate {
    #[serde(rename = "valor", default)]
    pub value: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    /// Admin only
    #[serde(rename = "visivel", default)]
    pub visible: Option<bool>,
    /// Admin only
    #[serde(rename = "ordem", default)]
    pub sort_order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("boolean".parse::<SettingKind>().unwrap(), SettingKind::Boolean);
        assert!("Boolean".parse::<SettingKind>().is_err());
        assert!("date".parse::<SettingKind>().is_err());
    }

    #[test]
    fn test_value_validation() {
        assert!(SettingKind::Number.validate_value("30").is_ok());
        assert!(SettingKind::Number.validate_value("2.5").is_ok());
        assert!(SettingKind::Number.validate_value("trinta").is_err());
        assert!(SettingKind::Number.validate_value("NaN").is_err());

        assert!(SettingKind::Boolean.validate_value("true").is_ok());
        assert!(SettingKind::Boolean.validate_value("sim").is_err());

        assert!(SettingKind::Json.validate_value(r#"{"a": [1, 2]}"#).is_ok());
        assert!(SettingKind::Json.validate_value("{a:1}").is_err());

        assert!(SettingKind::Color.validate_value("#0284c7").is_ok());
        assert!(SettingKind::Color.validate_value("red").is_err());

        assert!(SettingKind::Text.validate_value("").is_ok());
    }

    #[test]
    fn test_new_setting_checks_value_against_type() {
        let input: NewSetting = serde_json::from_value(serde_json::json!({
            "chave": "alertas.dias_garantia",
            "valor": "trinta",
            "grupo": "Alertas",
            "tipo": "number"
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        assert!(input.clone().into_fields(None).is_err());

        let fixed = NewSetting {
            value: Some("30".to_string()),
            ..input
        };
        let fields = fixed.into_fields(Some(1)).unwrap();
        assert_eq!(fields.kind, SettingKind::Number);
        assert!(fields.visible && !fields.restricted);
        assert_eq!(fields.user_id, Some(1));
    }

    #[test]
    fn test_grouping_keeps_input_order() {
        let grouped = group_settings(
            vec![("Email", "b"), ("Sistema", "a"), ("Email", "a")],
            |(group, _)| *group,
        );

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["Email"], vec![("Email", "b"), ("Email", "a")]);
        assert_eq!(grouped["Sistema"].len(), 1);
    }
}
