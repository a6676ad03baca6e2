//! Error types for the store, the link service and the HTTP layer.
//!
//! Failures travel upwards as values:
//!
//! - [`StoreError`] is returned by every [`LinkRepository`](crate::domain::repositories::LinkRepository)
//! - [`LinkError`] is the taxonomy surfaced by [`LinkService`](crate::application::services::LinkService)
//! - [`AppError`] is the JSON error envelope rendered by the API handlers

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Failures reported by the link store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with this alias already exists.
    #[error("alias '{0}' is already taken")]
    AliasTaken(String),

    /// No record exists for this alias.
    #[error("alias '{0}' not found")]
    NotFound(String),

    /// The backing storage failed or did not answer in time.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

/// Submitted form fields that failed validation.
///
/// Both flags are evaluated independently so the caller can highlight every
/// offending field at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvalidFields {
    pub url: bool,
    pub alias: bool,
}

impl InvalidFields {
    /// Returns true if at least one field is invalid.
    pub fn any(&self) -> bool {
        self.url || self.alias
    }
}

impl fmt::Display for InvalidFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.url, self.alias) {
            (true, true) => write!(f, "url and alias"),
            (true, false) => write!(f, "url"),
            (false, true) => write!(f, "alias"),
            (false, false) => write!(f, "input"),
        }
    }
}

/// Errors returned by link creation and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The submitted url and/or alias failed validation.
    #[error("invalid {0}")]
    Invalid(InvalidFields),

    /// The explicitly requested alias is already in use.
    #[error("alias '{0}' is already taken")]
    AliasTaken(String),

    /// No link exists for the requested alias.
    #[error("alias '{0}' not found")]
    AliasNotFound(String),

    /// The generator produced only colliding aliases within the retry budget.
    #[error("no free alias found after {0} attempts")]
    AliasSpaceExhausted(usize),

    /// The store failed or timed out.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl LinkError {
    pub fn invalid_url() -> Self {
        Self::Invalid(InvalidFields {
            url: true,
            alias: false,
        })
    }

    pub fn invalid_alias() -> Self {
        Self::Invalid(InvalidFields {
            url: false,
            alias: true,
        })
    }

    pub fn is_invalid_url(&self) -> bool {
        matches!(self, Self::Invalid(fields) if fields.url)
    }

    pub fn is_invalid_alias(&self) -> bool {
        matches!(self, Self::Invalid(fields) if fields.alias)
    }
}

impl From<StoreError> for LinkError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AliasTaken(alias) => Self::AliasTaken(alias),
            StoreError::NotFound(alias) => Self::AliasNotFound(alias),
            StoreError::Unavailable(reason) => Self::StorageUnavailable(reason),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned by the JSON API.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// HTTP-level error rendered as `{ "error": { code, message, details } }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    Unavailable { message: String, details: Value },
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
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
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

    /// Converts the error into its status code and serializable payload.
    pub fn to_error_info(self) -> (StatusCode, ErrorInfo) {
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
            AppError::Unavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_unavailable",
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

        (
            status,
            ErrorInfo {
                code,
                message,
                details,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.to_error_info();
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        match e {
            LinkError::Invalid(fields) => AppError::bad_request(
                format!("Invalid {fields}"),
                json!({ "url": fields.url, "alias": fields.alias }),
            ),
            LinkError::AliasTaken(alias) => {
                AppError::conflict("Alias is already taken", json!({ "alias": alias }))
            }
            LinkError::AliasNotFound(alias) => {
                AppError::not_found("Short link not found", json!({ "alias": alias }))
            }
            LinkError::AliasSpaceExhausted(attempts) => AppError::internal(
                "Failed to generate a unique alias",
                json!({ "reason": "alias_space_exhausted", "attempts": attempts }),
            ),
            LinkError::StorageUnavailable(_) => {
                // The driver message may leak connection details; keep it in the logs.
                AppError::unavailable("Storage is temporarily unavailable", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Invalid request", json!({ "reason": e.to_string() }))
    }
}
