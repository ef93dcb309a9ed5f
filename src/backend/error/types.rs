/**
 * Backend Error Types
 *
 * Errors raised by the reference backend's HTTP handlers. Every variant maps
 * to an HTTP status code and is returned to the client as a JSON body.
 *
 * # Error Categories
 *
 * - `HandlerError` - bad input, missing entities (explicit status code)
 * - `ConflictError` - a lock action not allowed in the current status
 * - `StateError` - server-side failures
 * - `SharedError` - validation errors from the shared module
 * - `SerializationError` - JSON encoding failures
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::error::BrandingError;
use crate::shared::lock::{LockStatus, LockTransition};

/// Backend-specific error types
///
/// ```rust
/// use tenant_branding::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., invalid request, unknown company)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Lock action rejected by the current status
    #[error("Cannot {action} while status is {status}")]
    ConflictError {
        status: LockStatus,
        action: LockTransition,
    },

    /// State management error
    #[error("State error: {message}")]
    StateError { message: String },

    /// Error from the shared module (validation, transitions)
    #[error(transparent)]
    SharedError(#[from] BrandingError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(status: LockStatus, action: LockTransition) -> Self {
        Self::ConflictError { status, action }
    }

    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// - `HandlerError` - the status code from the error
    /// - `ConflictError` - 409 Conflict
    /// - `StateError` - 500 Internal Server Error
    /// - `SharedError` - 400 for validation, 409 for transitions, else 500
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::ConflictError { .. } => StatusCode::CONFLICT,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                BrandingError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                BrandingError::TransitionError { .. } => StatusCode::CONFLICT,
                BrandingError::EditingLocked { .. } => StatusCode::CONFLICT,
                BrandingError::MissingCompany => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
