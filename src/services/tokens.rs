// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access tokens (HS256 JWT) and opaque refresh tokens.
//!
//! Refresh tokens are 32 random bytes, base64url encoded. The database only
//! ever sees their SHA-256 digest, so a leaked table cannot be replayed.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::AppError;
use crate::models::User;
use crate::time_utils::format_utc_rfc3339;

const REFRESH_TOKEN_BYTES: usize = 32;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub nome: String,
    pub nivel_id: i64,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }
}

/// Create an access token for `user`, valid for `ttl_minutes`.
pub fn create_access_token(user: &User, signing_key: &[u8], ttl_minutes: i64) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        nome: user.name.clone(),
        nivel_id: user.access_level_id,
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(ttl_minutes)).timestamp() as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Verify an access token's signature and expiry.
pub fn decode_access_token(token: &str, signing_key: &[u8]) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => {
                tracing::debug!(error = %e, "Access token rejected");
                AppError::InvalidToken
            }
        })
}

/// A freshly issued refresh token and what gets persisted for it.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    /// Handed to the client, never stored
    pub token: String,
    pub hash: String,
    pub expires_at: String,
}

pub fn issue_refresh_token(ttl_days: i64) -> Result<IssuedRefreshToken, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;

    let token = URL_SAFE_NO_PAD.encode(bytes);
    Ok(IssuedRefreshToken {
        hash: hash_refresh_token(&token),
        token,
        expires_at: format_utc_rfc3339(Utc::now() + Duration::days(ttl_days)),
    })
}

/// SHA-256 hex digest used to look a refresh token up.
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
