// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Visual themes and their CSS custom-property rendering.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::models::UserSummary;

pub const DEFAULT_PRIMARY_COLOR: &str = "#0284c7";
pub const DEFAULT_SECONDARY_COLOR: &str = "#0d9488";
pub const DEFAULT_LIGHT_BACKGROUND: &str = "#f8fafc";
pub const DEFAULT_DARK_BACKGROUND: &str = "#0f172a";
pub const DEFAULT_LIGHT_TEXT: &str = "#1e293b";
pub const DEFAULT_DARK_TEXT: &str = "#f1f5f9";
pub const DEFAULT_FONT: &str = "Inter";

/// A theme stored in `themes`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct Theme {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "cor_primaria")]
    pub primary_color: String,
    #[serde(rename = "cor_secundaria")]
    pub secondary_color: String,
    #[serde(rename = "cor_fundo_claro")]
    pub light_background: String,
    #[serde(rename = "cor_fundo_escuro")]
    pub dark_background: String,
    #[serde(rename = "cor_texto_claro")]
    pub light_text: String,
    #[serde(rename = "cor_texto_escuro")]
    pub dark_text: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    #[serde(rename = "fonte_principal")]
    pub main_font: String,
    #[serde(rename = "padrao")]
    pub is_default: bool,
    /// Created by a user rather than shipped with the system
    #[serde(rename = "personalizado")]
    pub custom: bool,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "css_custom")]
    pub custom_css: Option<String>,
    #[serde(rename = "usuario_id")]
    pub user_id: Option<i64>,
    #[serde(rename = "criado_em")]
    pub created_at: String,
    #[serde(rename = "atualizado_em")]
    pub updated_at: String,
}

impl Theme {
    /// Render the theme as CSS custom properties on `:root`, followed by the
    /// theme's custom CSS.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        let vars = [
            ("--cor-primaria", self.primary_color.as_str()),
            ("--cor-secundaria", self.secondary_color.as_str()),
            ("--cor-fundo-claro", self.light_background.as_str()),
            ("--cor-fundo-escuro", self.dark_background.as_str()),
            ("--cor-texto-claro", self.light_text.as_str()),
            ("--cor-texto-escuro", self.dark_text.as_str()),
        ];
        for (name, value) in vars {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push_str(&format!("  --fonte-principal: {};\n", css_font_family(&self.main_font)));
        css.push_str("}\n");

        if let Some(custom) = self.custom_css.as_deref().filter(|c| !c.trim().is_empty()) {
            css.push('\n');
            css.push_str(custom.trim_end());
            css.push('\n');
        }

        css
    }
}

/// Quote a font family name and append a generic fallback.
fn css_font_family(font: &str) -> String {
    let cleaned: String = font
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | ';' | '{' | '}' | '<' | '>'))
        .collect();
    format!("\"{}\", sans-serif", cleaned.trim())
}

/// Theme with the owning user resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeDetail {
    #[serde(flatten)]
    pub theme: Theme,
    #[serde(rename = "usuario")]
    pub owner: Option<UserSummary>,
}

/// `#RRGGBB` check used by theme payload validation.
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let valid = bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit);
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color")
            .with_message("Invalid color format, use hexadecimal #RRGGBB".into()))
    }
}

/// Create/update payload for a theme.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ThemeInput {
    #[serde(rename = "nome", default)]
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 100, message = "Name is required")
    )]
    pub name: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "cor_primaria", default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[serde(rename = "cor_secundaria", default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,
    #[serde(rename = "cor_fundo_claro", default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub light_background: Option<String>,
    #[serde(rename = "cor_fundo_escuro", default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub dark_background: Option<String>,
    #[serde(rename = "cor_texto_claro", default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub light_text: Option<String>,
    #[serde(rename = "cor_texto_escuro", default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub dark_text: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(rename = "fonte_principal", default)]
    pub main_font: Option<String>,
    #[serde(rename = "padrao", default)]
    pub is_default: Option<bool>,
    #[serde(rename = "personalizado", default)]
    pub custom: Option<bool>,
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
    #[serde(rename = "css_custom", default)]
    pub custom_css: Option<String>,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<i64>,
}

impl ThemeInput {
    /// Resolve the payload into a full row, filling absent fields from
    /// `existing` (update) or from the default palette (create).
    pub fn into_fields(self, existing: Option<&Theme>) -> ThemeFields {
        fn pick(value: Option<String>, existing: Option<&String>, default: &str) -> String {
            value
                .or_else(|| existing.cloned())
                .unwrap_or_else(|| default.to_string())
        }

        ThemeFields {
            name: pick(
                self.name.map(|n| n.trim().to_string()),
                existing.map(|e| &e.name),
                "",
            ),
            description: self.description.or_else(|| existing.and_then(|e| e.description.clone())),
            primary_color: pick(
                self.primary_color,
                existing.map(|e| &e.primary_color),
                DEFAULT_PRIMARY_COLOR,
            ),
            secondary_color: pick(
                self.secondary_color,
                existing.map(|e| &e.secondary_color),
                DEFAULT_SECONDARY_COLOR,
            ),
            light_background: pick(
                self.light_background,
                existing.map(|e| &e.light_background),
                DEFAULT_LIGHT_BACKGROUND,
            ),
            dark_background: pick(
                self.dark_background,
                existing.map(|e| &e.dark_background),
                DEFAULT_DARK_BACKGROUND,
            ),
            light_text: pick(self.light_text, existing.map(|e| &e.light_text), DEFAULT_LIGHT_TEXT),
            dark_text: pick(self.dark_text, existing.map(|e| &e.dark_text), DEFAULT_DARK_TEXT),
            logo_url: self.logo_url.or_else(|| existing.and_then(|e| e.logo_url.clone())),
            favicon_url: self.favicon_url.or_else(|| existing.and_then(|e| e.favicon_url.clone())),
            main_font: pick(self.main_font, existing.map(|e| &e.main_font), DEFAULT_FONT),
            is_default: self.is_default.or(existing.map(|e| e.is_default)).unwrap_or(false),
            custom: self.custom.or(existing.map(|e| e.custom)).unwrap_or(true),
            active: self.active.or(existing.map(|e| e.active)).unwrap_or(true),
            custom_css: self.custom_css.or_else(|| existing.and_then(|e| e.custom_css.clone())),
            user_id: self.user_id.or_else(|| existing.and_then(|e| e.user_id)),
        }
    }
}

/// Every writable column of a theme.
#[derive(Debug, Clone)]
pub struct ThemeFields {
    pub name: String,
    pub description: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub light_background: String,
    pub dark_background: String,
    pub light_text: String,
    pub dark_text: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub main_font: String,
    pub is_default: bool,
    pub custom: bool,
    pub active: bool,
    pub custom_css: Option<String>,
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        Theme {
            id: 1,
            name: "Tema Claro Padrão".to_string(),
            description: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            light_background: DEFAULT_LIGHT_BACKGROUND.to_string(),
            dark_background: DEFAULT_DARK_BACKGROUND.to_string(),
            light_text: DEFAULT_LIGHT_TEXT.to_string(),
            dark_text: DEFAULT_DARK_TEXT.to_string(),
            logo_url: None,
            favicon_url: None,
            main_font: DEFAULT_FONT.to_string(),
            is_default: true,
            custom: false,
            active: true,
            custom_css: None,
            user_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_css_variables() {
        let css = theme().to_css();
        assert!(css.starts_with(":root {\n"));
        assert!(css.contains("  --cor-primaria: #0284c7;\n"));
        assert!(css.contains("  --cor-texto-escuro: #f1f5f9;\n"));
        assert!(css.contains("  --fonte-principal: \"Inter\", sans-serif;\n"));
        assert!(css.ends_with("}\n"));
    }

    #[test]
    fn test_css_appends_custom_css_and_sanitizes_font() {
        let mut t = theme();
        t.main_font = "Evil\"; } body {".to_string();
        t.custom_css = Some(".sidebar { width: 240px; }\n\n".to_string());

        let css = t.to_css();
        assert!(css.contains("--fonte-principal: \"Evil  body\", sans-serif;"));
        assert!(css.ends_with("}\n\n.sidebar { width: 240px; }\n"));
    }

    #[test]
    fn test_hex_color_validation() {
        assert!(validate_hex_color("#A1b2C3").is_ok());
        assert!(validate_hex_color("#fff").is_err());
        assert!(validate_hex_color("0284c7").is_err());
        assert!(validate_hex_color("#0284cg").is_err());
    }

    #[test]
    fn test_theme_input_validation() {
        let input = ThemeInput {
            name: Some("Azul".to_string()),
            primary_color: Some("blue".to_string()),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("primary_color"));

        let missing_name = ThemeInput::default();
        assert!(missing_name.validate().is_err());
    }

    #[test]
    fn test_fields_use_default_palette_and_merge() {
        let created = ThemeInput {
            name: Some(" Azul ".to_string()),
            ..Default::default()
        }
        .into_fields(None);
        assert_eq!(created.name, "Azul");
        assert_eq!(created.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(created.main_font, DEFAULT_FONT);
        assert!(created.custom && created.active && !created.is_default);

        let existing = theme();
        let updated = ThemeInput {
            secondary_color: Some("#123456".to_string()),
            ..Default::default()
        }
        .into_fields(Some(&existing));
        assert_eq!(updated.name, existing.name);
        assert_eq!(updated.secondary_color, "#123456");
        assert!(updated.is_default);
        assert!(!updated.custom);
    }
}
