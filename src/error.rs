// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Token not provided")]
    MissingToken,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("User inactive")]
    UserInactive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled. Contact the administrator.")]
    AccountDisabled,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Bad request carrying a structured payload (e.g. dependent record counts).
    #[error("Invalid request: {message}")]
    BadRequestWithDetails {
        message: String,
        details: serde_json::Value,
    },

    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests from this IP, try again later")]
    RateLimited,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code sent as the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingToken => "missing_token",
            AppError::InvalidTokenFormat => "invalid_token_format",
            AppError::TokenExpired => "token_expired",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::UserInactive => "user_inactive",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::AccountDisabled => "account_disabled",
            AppError::InvalidRefreshToken => "invalid_refresh_token",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) | AppError::BadRequestWithDetails { .. } => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::Conflict(_) => "conflict",
            AppError::RateLimited => "rate_limited",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken
            | AppError::InvalidTokenFormat
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::UserNotFound
            | AppError::UserInactive
            | AppError::InvalidCredentials
            | AppError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AppError::AccountDisabled | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_)
            | AppError::BadRequestWithDetails { .. }
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code();

        let (message, details) = match self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                ("Internal server error".to_string(), None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ("Internal server error".to_string(), None)
            }
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Forbidden(msg) => (msg, None),
            AppError::BadRequestWithDetails { message, details } => (message, Some(details)),
            AppError::Validation(errors) => (
                "Invalid input data".to_string(),
                serde_json::to_value(&errors).ok(),
            ),
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            error,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
