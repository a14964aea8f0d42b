// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Default data: access levels, themes, settings, menu and the initial
//! administrator. Every step is idempotent.

use serde_json::{json, Value};

use crate::db::Database;
use crate::error::AppError;
use crate::models::{MenuItemInput, NewUser, SettingFields, SettingKind, ThemeInput};
use crate::services::password::hash_password;

pub const ADMIN_EMAIL: &str = "admin@sistema.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// What a seed run changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub access_levels: usize,
    pub themes_created: usize,
    pub settings_created: usize,
    pub menu_items_created: usize,
    pub admin_created: bool,
}

fn crud(criar: bool, ler: bool, atualizar: bool, excluir: bool) -> Value {
    json!({ "criar": criar, "ler": ler, "atualizar": atualizar, "excluir": excluir })
}

/// `(name, description, permissions)` for the four built-in levels, most
/// privileged first so a fresh database numbers them 1 to 4.
fn default_access_levels() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        (
            "Administrador",
            "Acesso total ao sistema",
            json!({
                "usuarios": crud(true, true, true, true),
                "equipamentos": crud(true, true, true, true),
                "departamentos": crud(true, true, true, true),
                "empresas": crud(true, true, true, true),
                "localizacoes": crud(true, true, true, true),
                "configuracoes": { "ler": true, "atualizar": true },
                "temas": crud(true, true, true, true),
                "menu": crud(true, true, true, true),
                "relatorios": { "gerar": true, "exportar": true },
                "auditoria": { "ler": true },
            }),
        ),
        (
            "Gerente",
            "Gerenciamento de departamentos e usuários",
            json!({
                "usuarios": crud(true, true, true, false),
                "equipamentos": crud(true, true, true, false),
                "departamentos": crud(false, true, true, false),
                "empresas": crud(false, true, false, false),
                "localizacoes": crud(true, true, true, false),
                "configuracoes": { "ler": true, "atualizar": false },
                "temas": crud(false, true, false, false),
                "menu": crud(false, true, false, false),
                "relatorios": { "gerar": true, "exportar": true },
                "auditoria": { "ler": true },
            }),
        ),
        (
            "Técnico",
            "Operações em equipamentos e movimentações",
            json!({
                "usuarios": crud(false, true, false, false),
                "equipamentos": crud(true, true, true, false),
                "departamentos": crud(false, true, false, false),
                "empresas": crud(false, true, false, false),
                "localizacoes": crud(false, true, false, false),
                "configuracoes": { "ler": true, "atualizar": false },
                "temas": crud(false, true, false, false),
                "menu": crud(false, true, false, false),
                "relatorios": { "gerar": true, "exportar": false },
                "auditoria": { "ler": false },
            }),
        ),
        (
            "Usuário",
            "Visualização básica e solicitações",
            json!({
                "usuarios": crud(false, false, false, false),
                "equipamentos": crud(false, true, false, false),
                "departamentos": crud(false, true, false, false),
                "empresas": crud(false, true, false, false),
                "localizacoes": crud(false, true, false, false),
                "configuracoes": { "ler": false, "atualizar": false },
                "temas": crud(false, true, false, false),
                "menu": crud(false, true, false, false),
                "relatorios": { "gerar": false, "exportar": false },
                "auditoria": { "ler": false },
            }),
        ),
    ]
}

fn default_themes() -> Vec<ThemeInput> {
    let theme = |name: &str, description: &str, primary: &str, secondary: &str, dark_bg: &str, default: bool| {
        ThemeInput {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            primary_color: Some(primary.to_string()),
            secondary_color: Some(secondary.to_string()),
            dark_background: Some(dark_bg.to_string()),
            is_default: Some(default),
            custom: Some(false),
            active: Some(true),
            ..Default::default()
        }
    };

    vec![
        theme("Tema Claro Padrão", "Tema claro padrão do sistema", "#0284c7", "#0d9488", "#0f172a", true),
        theme("Tema Escuro Padrão", "Tema escuro padrão do sistema", "#38bdf8", "#2dd4bf", "#0f172a", false),
        theme("Tema Verde", "Tema verde", "#10b981", "#059669", "#134e4a", false),
    ]
}

fn default_settings() -> Vec<SettingFields> {
    use SettingKind::{Boolean, Number, Text};

    let setting = |key: &str, value: &str, group: &str, description: &str, kind, restricted, sort_order| {
        SettingFields {
            key: key.to_string(),
            value: value.to_string(),
            group: group.to_string(),
            description: Some(description.to_string()),
            kind,
            visible: true,
            restricted,
            sort_order,
            user_id: None,
        }
    };

    vec![
        setting("sistema.nome", "Sistema de Controle de TI", "Sistema", "Nome do sistema exibido no topo das páginas", Text, false, 1),
        setting("sistema.versao", env!("CARGO_PKG_VERSION"), "Sistema", "Versão atual do sistema", Text, true, 2),
        setting("sistema.modo_debug", "false", "Sistema", "Ativa o modo de depuração com logs detalhados", Boolean, true, 3),
        setting("alertas.dias_garantia", "30", "Alertas", "Dias antes do vencimento da garantia para exibir alertas", Number, false, 1),
        setting("alertas.ativo", "true", "Alertas", "Ativa/desativa o sistema de alertas", Boolean, false, 2),
        setting("email.envio_ativo", "false", "Email", "Ativa/desativa o envio de emails pelo sistema", Boolean, false, 1),
        setting("email.servidor", "smtp.exemplo.com.br", "Email", "Servidor SMTP para envio de emails", Text, false, 2),
        setting("email.porta", "587", "Email", "Porta para conexão com servidor SMTP", Number, false, 3),
        setting("email.usuario", "notificacao@exemplo.com.br", "Email", "Usuário para autenticação no servidor SMTP", Text, true, 4),
        setting("email.senha", "", "Email", "Senha para autenticação no servidor SMTP", Text, true, 5),
        setting("email.remetente", "Controle de TI <notificacao@exemplo.com.br>", "Email", "Nome e email que aparecerá como remetente", Text, false, 6),
        setting("interface.sidebar_colapsada", "false", "Interface", "Define se o menu lateral inicia colapsado", Boolean, false, 1),
        setting("interface.itens_por_pagina", "10", "Interface", "Quantidade padrão de itens por página em listagens", Number, false, 2),
        setting("interface.tema_padrao_forcar", "false", "Interface", "Força o uso do tema padrão para todos os usuários", Boolean, true, 3),
    ]
}

/// A root menu entry with its children.
struct MenuSeed {
    title: &'static str,
    icon: &'static str,
    url: Option<&'static str>,
    min_level: i64,
    children: Vec<MenuSeed>,
}

fn menu(title: &'static str, icon: &'static str, url: Option<&'static str>, min_level: i64) -> MenuSeed {
    MenuSeed {
        title,
        icon,
        url,
        min_level,
        children: Vec::new(),
    }
}

fn default_menu() -> Vec<MenuSeed> {
    vec![
        menu("Dashboard", "home", Some("/"), 4),
        MenuSeed {
            children: vec![
                menu("Equipamentos", "computer", Some("/equipamentos"), 4),
                menu("Tipos de Equipamento", "tag", Some("/tipos-equipamento"), 3),
            ],
            ..menu("Inventário", "package", None, 4)
        },
        MenuSeed {
            children: vec![
                menu("Configurações", "sliders", Some("/configuracoes"), 1),
                menu("Menu", "list", Some("/admin/menu"), 1),
                menu("Temas", "palette", Some("/admin/temas"), 1),
                menu("Níveis de Acesso", "shield", Some("/admin/niveis-acesso"), 1),
            ],
            ..menu("Administração", "settings", None, 1)
        },
    ]
}

impl MenuSeed {
    fn input(&self, sort_order: i64, parent_id: Option<i64>) -> MenuItemInput {
        MenuItemInput {
            title: Some(self.title.to_string()),
            icon: Some(self.icon.to_string()),
            url: self.url.map(str::to_string),
            sort_order: Some(sort_order),
            min_level: Some(self.min_level),
            parent_id,
            ..Default::default()
        }
    }
}

pub async fn seed_access_levels(db: &Database) -> Result<usize, AppError> {
    let levels = default_access_levels();
    for (name, description, permissions) in &levels {
        match db.get_access_level_by_name(name).await? {
            Some(existing) => {
                db.update_access_level(existing.id, name, Some(description), Some(permissions))
                    .await?;
            }
            None => {
                db.create_access_level(name, Some(description), Some(permissions))
                    .await?;
            }
        }
    }
    Ok(levels.len())
}

/// Insert missing themes. Existing themes keep their colours and the current
/// default is never moved.
pub async fn seed_themes(db: &Database) -> Result<usize, AppError> {
    let mut has_default = db.get_default_theme().await?.is_some();
    let mut created = 0;
    for input in default_themes() {
        let name = input.name.clone().unwrap_or_default();
        if db.get_theme_by_name(&name).await?.is_some() {
            continue;
        }

        let mut fields = input.into_fields(None);
        if has_default {
            fields.is_default = false;
        }
        has_default |= fields.is_default;
        db.create_theme(&fields).await?;
        created += 1;
    }
    Ok(created)
}

/// Insert missing settings. Existing values are never overwritten.
pub async fn seed_settings(db: &Database) -> Result<usize, AppError> {
    let mut created = 0;
    for setting in default_settings() {
        if db.get_setting_by_key(&setting.key).await?.is_none() {
            db.create_setting(&setting).await?;
            created += 1;
        }
    }
    Ok(created)
}

/// Create the default menu, only when the menu is empty.
pub async fn seed_menu(db: &Database) -> Result<usize, AppError> {
    if !db.list_all_menu_items().await?.is_empty() {
        return Ok(0);
    }

    let mut created = 0;
    for (position, root) in default_menu().iter().enumerate() {
        let parent = db
            .create_menu_item(&root.input(position as i64 + 1, None).into_fields(None))
            .await?;
        created += 1;

        for (child_position, child) in root.children.iter().enumerate() {
            db.create_menu_item(
                &child
                    .input(child_position as i64 + 1, Some(parent.id))
                    .into_fields(None),
            )
            .await?;
            created += 1;
        }
    }
    Ok(created)
}

/// Create the administrator account if it does not exist yet.
pub async fn seed_admin_user(db: &Database, password: &str, bcrypt_cost: u32) -> Result<bool, AppError> {
    if db.get_user_by_email(ADMIN_EMAIL).await?.is_some() {
        return Ok(false);
    }

    let level = db
        .get_access_level_by_name("Administrador")
        .await?
        .ok_or_else(|| AppError::NotFound("Access level Administrador".to_string()))?;

    db.create_user(&NewUser {
        name: "Administrador".to_string(),
        email: ADMIN_EMAIL.to_string(),
        password_hash: hash_password(password.to_string(), bcrypt_cost).await?,
        job_title: Some("Administrador do Sistema".to_string()),
        access_level_id: level.id,
        active: true,
    })
    .await?;

    tracing::info!(email = ADMIN_EMAIL, "Created administrator account");
    Ok(true)
}

/// Run every seed step in dependency order.
pub async fn seed_defaults(db: &Database, admin_password: &str, bcrypt_cost: u32) -> Result<SeedReport, AppError> {
    let report = SeedReport {
        access_levels: seed_access_levels(db).await?,
        themes_created: seed_themes(db).await?,
        settings_created: seed_settings(db).await?,
        menu_items_created: seed_menu(db).await?,
        admin_created: seed_admin_user(db, admin_password, bcrypt_cost).await?,
    };

    tracing::info!(
        access_levels = report.access_levels,
        themes_created = report.themes_created,
        settings_created = report.settings_created,
        menu_items_created = report.menu_items_created,
        admin_created = report.admin_created,
        "Seed complete"
    );

    Ok(report)
}
