// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! bcrypt password hashing, run on the blocking thread pool.

use crate::error::AppError;
use anyhow::Context;

pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("bcrypt hash failed")?;
    Ok(hash)
}

/// Check `password` against a stored hash. A malformed hash never verifies.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?;

    match matches {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not valid bcrypt");
            Ok(false)
        }
    }
}
