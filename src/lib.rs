// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Controle de TI: IT asset management backend
//!
//! This crate provides the JSON API behind the Controle de TI frontend:
//! JWT authentication with rotating refresh tokens, role-based menus,
//! theming, system settings, and equipment type management.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use middleware::RateLimiter;
use std::time::Duration;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let rate_limiter = RateLimiter::new(
            Duration::from_secs(config.rate_limit_window_minutes * 60),
            config.rate_limit_max,
        );
        Self {
            config,
            db,
            rate_limiter,
        }
    }
}
