//! User model for storage and API.

use serde::Serialize;
use sqlx::FromRow;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User account stored in the `users` table.
///
/// Never serialized directly: the password hash must not leave the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Always stored lowercase
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
    /// Job title ("cargo")
    pub job_title: Option<String>,
    pub active: bool,
    pub access_level_id: i64,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub job_title: Option<String>,
    pub access_level_id: i64,
    pub active: bool,
}

/// Public identity of a user embedded in other resources
/// (theme owner, last editor of a setting).
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct UserSummary {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// A refresh token row. Only the SHA-256 digest of the token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub token_hash: String,
    pub user_id: i64,
    pub expires_at: String,
    pub created_at: String,
}
