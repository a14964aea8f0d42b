// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware and access-level checks.

use crate::error::AppError;
use crate::models::access_level::permission_granted;
use crate::models::ADMIN_LEVEL_ID;
use crate::services::tokens::decode_access_token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Authenticated user, resolved from the access token and the database.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/generated/")
)]
pub struct AuthUser {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "cargo")]
    pub job_title: Option<String>,
    #[serde(rename = "nivel_id")]
    pub access_level_id: i64,
    /// Access level name
    #[serde(rename = "nivel")]
    pub access_level: Option<String>,
    #[serde(rename = "permissoes")]
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub permissions: Option<Value>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.access_level_id == ADMIN_LEVEL_ID
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = self.id, level = self.access_level_id, "Admin access denied");
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }

    /// Allow levels at least as privileged as `max_level` (lower id is more privileged).
    pub fn require_level(&self, max_level: i64) -> Result<(), AppError> {
        if self.access_level_id <= max_level {
            Ok(())
        } else {
            tracing::warn!(
                user_id = self.id,
                level = self.access_level_id,
                required = max_level,
                "Access level too low"
            );
            Err(AppError::Forbidden(format!(
                "Access level {} or higher required",
                max_level
            )))
        }
    }

    /// Check a `resource.action` permission. Administrators always pass.
    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.is_admin() || permission_granted(self.permissions.as_ref(), permission) {
            Ok(())
        } else {
            tracing::warn!(user_id = self.id, permission, "Permission denied");
            Err(AppError::Forbidden(format!("Missing permission: {}", permission)))
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::InvalidTokenFormat)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && !token.contains(char::is_whitespace) => Ok(token),
        _ => Err(AppError::InvalidTokenFormat),
    }
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let claims = decode_access_token(token, &state.config.jwt_signing_key).inspect_err(|e| {
        tracing::warn!(path = %request.uri().path(), error = %e, "Rejected access token");
    })?;
    let user_id = claims.user_id()?;

    let user = state.db.get_user(user_id).await?.ok_or_else(|| {
        tracing::warn!(user_id, "Token for unknown user");
        AppError::UserNotFound
    })?;

    if !user.active {
        tracing::warn!(user_id, "Token for inactive user");
        return Err(AppError::UserInactive);
    }

    let level = state.db.get_access_level(user.access_level_id).await?;

    let auth_user = AuthUser {
        id: user.id,
        name: user.name,
        email: user.email,
        job_title: user.job_title,
        access_level_id: user.access_level_id,
        access_level: level.as_ref().map(|l| l.name.clone()),
        permissions: level.and_then(|l| l.permissions).map(|p| p.0),
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn user(level: i64, permissions: Option<Value>) -> AuthUser {
        AuthUser {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            job_title: None,
            access_level_id: level,
            access_level: None,
            permissions,
        }
    }

    #[test]
    fn test_bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AppError::MissingToken)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        for malformed in ["bearer abc.def", "Bearer  abc.def", "Bearer abc.def ", "Bearer\tabc.def", "Bearer "] {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_static(malformed));
            assert!(
                matches!(bearer_token(&headers), Err(AppError::InvalidTokenFormat)),
                "{:?}",
                malformed
            );
        }

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert!(matches!(bearer_token(&headers), Err(AppError::InvalidTokenFormat)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(bearer_token(&headers), Err(AppError::InvalidTokenFormat)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer a b"));
        assert!(matches!(bearer_token(&headers), Err(AppError::InvalidTokenFormat)));
    }

    #[test]
    fn test_level_checks() {
        let admin = user(1, None);
        let tecnico = user(3, None);

        assert!(admin.require_admin().is_ok());
        assert!(tecnico.require_admin().is_err());
        assert!(tecnico.require_level(3).is_ok());
        assert!(tecnico.require_level(2).is_err());
        assert!(admin.require_level(4).is_ok());
    }

    #[test]
    fn test_permission_checks() {
        let admin = user(1, None);
        assert!(admin.require_permission("equipamentos.excluir").is_ok());

        let tecnico = user(3, Some(json!({"equipamentos": {"criar": true, "excluir": false}})));
        assert!(tecnico.require_permission("equipamentos.criar").is_ok());
        assert!(matches!(
            tecnico.require_permission("equipamentos.excluir"),
            Err(AppError::Forbidden(_))
        ));
    }
}
