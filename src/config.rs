// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::str::FromStr;

/// Runtime environment, mirrors the usual development/production split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::Invalid("APP_ENV", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// SQLx connection string (SQLite)
    pub database_url: String,
    /// Allowed CORS origin in production
    pub frontend_url: String,
    pub environment: Environment,

    /// HS256 signing key for access tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,

    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,

    pub rate_limit_window_minutes: u64,
    pub rate_limit_max: u32,
    /// Reverse proxies in front of the server that append to
    /// `X-Forwarded-For`. Zero ignores the header.
    pub trust_proxy_hops: usize,
}

impl Config {
    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            port: 4020,
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            environment: Environment::Test,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            access_token_ttl_minutes: 60,
            refresh_token_ttl_days: 7,
            bcrypt_cost: 4,
            rate_limit_window_minutes: 15,
            rate_limit_max: 10_000,
            trust_proxy_hops: 1,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let environment = match env::var("APP_ENV") {
            Ok(raw) => raw.parse()?,
            Err(_) => Environment::Development,
        };

        let bcrypt_cost: u32 = env_or("BCRYPT_COST", 10);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "BCRYPT_COST",
                format!("{} (must be between 4 and 31)", bcrypt_cost),
            ));
        }

        Ok(Self {
            port: env_or("PORT", 4020),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://controle_ti.db?mode=rwc".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            environment,
            jwt_signing_key: jwt_secret.trim().as_bytes().to_vec(),
            access_token_ttl_minutes: env_or("ACCESS_TOKEN_TTL_MINUTES", 60),
            refresh_token_ttl_days: env_or("REFRESH_TOKEN_TTL_DAYS", 7),
            bcrypt_cost,
            rate_limit_window_minutes: env_or("RATE_LIMIT_WINDOW_MINUTES", 15),
            rate_limit_max: env_or("RATE_LIMIT_MAX", 100),
            trust_proxy_hops: env_or("TRUST_PROXY_HOPS", 1),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Read an optional variable, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SECRET", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("PORT", "5050");
        env::remove_var("APP_ENV");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(config.port, 5050);
        assert_eq!(config.access_token_ttl_minutes, 60);
        assert_eq!(config.refresh_token_ttl_days, 7);
        assert_eq!(config.trust_proxy_hops, 1);
        assert!(!config.is_production());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }
}
