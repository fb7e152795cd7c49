use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::ContactId;

/// Errors raised by the contact schema and its storage collaborators.
#[derive(Debug, Error)]
pub enum ContactError {
    /// An insert or update payload does not satisfy its shape.
    #[error("Validation error on `{field}`: {reason}")]
    Validation { field: String, reason: String },
    /// A record handed back by storage does not satisfy the Row shape.
    #[error("Schema violation on `{field}`: {reason}")]
    SchemaViolation { field: String, reason: String },
    #[error("Contact not found: {0}")]
    NotFound(ContactId),
    #[error("Contact already exists: {0}")]
    Conflict(ContactId),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ContactError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ContactError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn schema_violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ContactError::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for ContactError {
    fn from(err: sqlx::Error) -> Self {
        ContactError::Storage(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation { .. } => AppError::BadRequest(err.to_string()),
            ContactError::NotFound(_) => AppError::NotFound(err.to_string()),
            ContactError::Conflict(_) => AppError::Conflict(err.to_string()),
            ContactError::SchemaViolation { .. } | ContactError::Storage(_) => {
                tracing::error!(error = %err, "Contact storage failure");
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
