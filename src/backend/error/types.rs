/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the chat core and the HTTP-facing
 * error used by Axum handlers.
 *
 * # Error Categories
 *
 * ## Chat Errors
 *
 * `ChatError` is returned by chat operations and reported back to the
 * connection that triggered them:
 * - Validation failures (empty or oversized text, blank recipient)
 * - Handshake failures (missing, malformed or expired credential)
 * - Persistence failures (store unavailable or write failed)
 * - Authorization violations (history requested for somebody else)
 *
 * Push failures are not errors: a message that reached the store is
 * delivered, whether or not the push succeeded.
 *
 * ## Backend Errors
 *
 * `BackendError` occurs while processing HTTP requests (the handshake
 * endpoint, health checks) and converts into a JSON response.
 */

use crate::backend::chat::store::StoreError;
use crate::shared::ErrorKind;
use axum::http::StatusCode;
use thiserror::Error;

/// Per-operation chat failure
///
/// All variants are recoverable by the caller retrying the triggering action.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed, empty or oversized input, rejected before persistence
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The authentication handshake failed; the connection is never admitted
    #[error("Authentication failed: {message}")]
    Auth {
        /// Human-readable error message
        message: String,
    },

    /// The durable store rejected or could not perform the operation
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// A caller asked for a conversation they are not a party to
    #[error("Authorization violation: {message}")]
    AuthorizationViolation {
        /// Human-readable error message
        message: String,
    },
}

impl ChatError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new authorization violation
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::AuthorizationViolation {
            message: message.into(),
        }
    }

    /// Wire category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::AuthorizationViolation { .. } => ErrorKind::AuthorizationViolation,
        }
    }
}

/// Backend-specific error types
///
/// This enum represents errors raised while serving HTTP requests. Each
/// variant maps to a status code and can be returned directly from a handler.
///
/// # Usage
///
/// ```rust
/// use xfchat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., missing headers, invalid request)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Chat operation error
    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Chat(Validation)` - 400 Bad Request
    /// - `Chat(Auth)` - 401 Unauthorized
    /// - `Chat(AuthorizationViolation)` - 403 Forbidden
    /// - `Chat(Persistence)` - 503 Service Unavailable
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Chat(err) => match err {
                ChatError::Validation { .. } => StatusCode::BAD_REQUEST,
                ChatError::Auth { .. } => StatusCode::UNAUTHORIZED,
                ChatError::AuthorizationViolation { .. } => StatusCode::FORBIDDEN,
                ChatError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Chat(err) => err.to_string(),
        }
    }
}
