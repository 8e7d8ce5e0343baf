use crate::db::errors::DbError;
use crate::schemas::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Submission body violated its schema
    #[error("Validation failed for {} field(s)", .errors.len())]
    Validation { errors: Vec<FieldError> },

    /// Collection name outside the read endpoint's allow-list
    #[error("Invalid collection: {name}")]
    InvalidCollection { name: String },

    /// No database handle was configured at startup
    #[error("Database not configured")]
    DatabaseUnavailable,

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Document store operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidCollection { .. } => StatusCode::BAD_REQUEST,
            Error::DatabaseUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { .. } => "Validation failed".to_string(),
            Error::InvalidCollection { .. } => "Invalid collection".to_string(),
            Error::DatabaseUnavailable => "Database not available".to_string(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) | Error::DatabaseUnavailable => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Validation { .. } | Error::InvalidCollection { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Validation errors carry the full per-field detail so the client
            // can correct everything in one pass.
            Error::Validation { errors } => {
                let body = json!({
                    "message": "Validation failed",
                    "errors": errors,
                });
                (status, axum::response::Json(body)).into_response()
            }
            Error::InvalidCollection { name } => {
                let body = json!({
                    "message": "Invalid collection",
                    "collection": name,
                });
                (status, axum::response::Json(body)).into_response()
            }
            _ => {
                // For all other errors, return simple text message
                let user_message = self.user_message();
                (status, user_message).into_response()
            }
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        let validation = Error::Validation {
            errors: vec![FieldError {
                field: "message".to_string(),
                reason: "field required".to_string(),
            }],
        };
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid = Error::InvalidCollection {
            name: "unknowncollection".to_string(),
        };
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        assert_eq!(Error::DatabaseUnavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            Error::Internal {
                operation: "create document".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_handle_message_fits_reads_and_writes() {
        // Surfaced from both the write endpoints and the read-back endpoint,
        // so the message names neither operation.
        assert_eq!(Error::DatabaseUnavailable.user_message(), "Database not available");
    }

    #[test]
    fn user_messages_do_not_leak_internals() {
        let err = Error::Database(DbError::Other(anyhow::anyhow!("connection refused to 10.0.0.5:5432")));
        assert_eq!(err.user_message(), "Database error occurred");
    }
}
