//! Application error taxonomy and HTTP mapping.
//!
//! Webhook consumers rely on the `code` field to distinguish retryable
//! (`transient_storage`) from non-retryable (`conflict`, `invalid_transition`)
//! outcomes, so the mapping here is part of the partner-facing contract.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or rejected input (bad URL, unknown partner, inactive partner).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown tracking code, transaction, or earning.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Unique-constraint collision that is not an idempotent replay.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Illegal status change request; never retried automatically.
    #[error("{message}")]
    InvalidTransition { message: String, details: Value },

    /// Programming-contract failure (e.g. an earning for a non-completed
    /// transaction). Fatal to the operation, logged at error level.
    #[error("{message}")]
    InvariantViolation { message: String, details: Value },

    /// Connectivity/timeout failure on persistence; safe to retry.
    #[error("{message}")]
    TransientStorage { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_transition(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidTransition {
            message: message.into(),
            details,
        }
    }
    pub fn invariant(message: impl Into<String>, details: Value) -> Self {
        Self::InvariantViolation {
            message: message.into(),
            details,
        }
    }
    pub fn transient(message: impl Into<String>, details: Value) -> Self {
        Self::TransientStorage {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// True when a retry with the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::TransientStorage { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::InvalidTransition { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_transition",
                message,
                details,
            ),
            AppError::InvariantViolation { message, details } => {
                tracing::error!(message = %message, "invariant violation");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "invariant_violation",
                    message,
                    details,
                )
            }
            AppError::TransientStorage { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "transient_storage",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) => {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            AppError::internal("Database error", json!({}))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
            AppError::transient("Storage temporarily unavailable", json!({}))
        }
        _ => AppError::internal("Database error", json!({})),
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}
