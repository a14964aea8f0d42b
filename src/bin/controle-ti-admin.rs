// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative tasks: schema migration, default data and user promotion.

use clap::{Parser, Subcommand};
use controle_ti::db::Database;
use controle_ti::models::ADMIN_LEVEL_ID;
use controle_ti::services::seed::{seed_defaults, DEFAULT_ADMIN_PASSWORD};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Controle de TI administration tool")]
struct Cli {
    /// Database connection string.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://controle_ti.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema if it does not exist.
    Migrate,
    /// Insert default access levels, themes, settings, menu and the admin account.
    Seed {
        /// Password for admin@sistema.com when the account is created.
        #[arg(long, env = "ADMIN_PASSWORD", default_value = DEFAULT_ADMIN_PASSWORD)]
        admin_password: String,

        #[arg(long, env = "BCRYPT_COST", default_value_t = 10)]
        bcrypt_cost: u32,
    },
    /// Give an existing user the Administrador level.
    Promote {
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;
    db.migrate().await?;

    match cli.command {
        Command::Migrate => {
            tracing::info!("Schema is up to date");
        }
        Command::Seed {
            admin_password,
            bcrypt_cost,
        } => {
            if !(4..=31).contains(&bcrypt_cost) {
                anyhow::bail!("bcrypt cost must be between 4 and 31, got {}", bcrypt_cost);
            }
            let report = seed_defaults(&db, &admin_password, bcrypt_cost).await?;
            tracing::info!(
                access_levels = report.access_levels,
                themes_created = report.themes_created,
                settings_created = report.settings_created,
                menu_items_created = report.menu_items_created,
                admin_created = report.admin_created,
                "Seed complete"
            );
            if report.admin_created && admin_password == DEFAULT_ADMIN_PASSWORD {
                tracing::warn!("Administrator created with the default password; change it");
            }
        }
        Command::Promote { email } => {
            if !db.set_user_access_level(&email, ADMIN_LEVEL_ID).await? {
                anyhow::bail!("no user with email {}", email);
            }
            tracing::info!(email = %email, "User promoted to Administrador");
        }
    }

    Ok(())
}
