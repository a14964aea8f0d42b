// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Table definitions, applied idempotently at startup.

use super::Database;
use crate::error::AppError;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "access_levels",
        r#"
        CREATE TABLE IF NOT EXISTS access_levels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            permissions TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            job_title TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            access_level_id INTEGER NOT NULL REFERENCES access_levels(id),
            avatar TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "refresh_tokens",
        r#"
        CREATE TABLE IF NOT EXISTS refresh_tokens (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            token_hash TEXT NOT NULL UNIQUE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "refresh_tokens user index",
        "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user ON refresh_tokens(user_id)",
    ),
    (
        "menu_items",
        r#"
        CREATE TABLE IF NOT EXISTS menu_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            icon TEXT,
            url TEXT,
            component TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            external INTEGER NOT NULL DEFAULT 0,
            requires_auth INTEGER NOT NULL DEFAULT 1,
            min_level INTEGER NOT NULL DEFAULT 1,
            permissions TEXT,
            parent_id INTEGER REFERENCES menu_items(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "themes",
        r#"
        CREATE TABLE IF NOT EXISTS themes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            primary_color TEXT NOT NULL,
            secondary_color TEXT NOT NULL,
            light_background TEXT NOT NULL,
            dark_background TEXT NOT NULL,
            light_text TEXT NOT NULL,
            dark_text TEXT NOT NULL,
            logo_url TEXT,
            favicon_url TEXT,
            main_font TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            custom INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            custom_css TEXT,
            user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "themes default index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_themes_single_default ON themes(is_default) WHERE is_default = 1",
    ),
    (
        "settings",
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            value TEXT NOT NULL,
            group_name TEXT NOT NULL,
            description TEXT,
            kind TEXT NOT NULL DEFAULT 'text',
            visible INTEGER NOT NULL DEFAULT 1,
            restricted INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "equipment_types",
        r#"
        CREATE TABLE IF NOT EXISTS equipment_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            icon TEXT,
            color TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "equipment_types name index",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_equipment_types_name ON equipment_types(name COLLATE NOCASE)",
    ),
];

impl Database {
    /// Create all tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<(), AppError> {
        for (name, sql) in STATEMENTS {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Failed to create {}: {}", name, e)))?;
        }

        tracing::info!("Database migrations complete");
        Ok(())
    }
}
