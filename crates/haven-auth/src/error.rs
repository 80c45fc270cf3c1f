//! Error types for authentication and authorization operations
//!
//! This module defines all error types that can occur during
//! authentication, policy evaluation, and credential lifecycle flows.
//! Every failure is a typed return; nothing here terminates the process,
//! and no operation retries internally.

use thiserror::Error;

use haven_org::StoreError;

/// Authentication and credential-lifecycle error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session token has expired
    #[error("token has expired")]
    TokenExpired,

    /// Session token is invalid (malformed, bad signature, etc.)
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A referenced identity or resource is absent
    #[error("{0}")]
    NotFound(String),

    /// Malformed or mismatched input; several reasons may accumulate
    #[error("validation failed: {}", reasons.join("; "))]
    Validation {
        /// One entry per violated rule
        reasons: Vec<String>,
    },

    /// An authorization predicate failed, or a security code did not match.
    /// Deliberately carries no detail to avoid leaking account state.
    #[error("not permitted")]
    Denied,

    /// The request collides with existing state (duplicate email, duplicate
    /// role profile)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Build a single-reason validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        AuthError::Validation {
            reasons: vec![reason.into()],
        }
    }

    /// Check if this error should be logged at error level.
    ///
    /// Expected failures (denials, validation, lookups) are not server
    /// errors.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthError::Config(_) | AuthError::Store(_) | AuthError::Internal(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::TokenExpired | AuthError::InvalidToken(_) => 401,
            AuthError::Denied => 403,
            AuthError::NotFound(_) => 404,
            AuthError::Validation { .. } => 400,
            AuthError::Conflict(_) => 409,
            AuthError::Config(_) | AuthError::Store(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Validation { .. } => "VALIDATION_FAILED",
            AuthError::Denied => "DENIED",
            AuthError::Conflict(_) => "CONFLICT",
            AuthError::Config(_) => "CONFIG_ERROR",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_reasons_aggregate_in_message() {
        let err = AuthError::Validation {
            reasons: vec!["too short".into(), "needs a digit".into()],
        };
        assert_eq!(err.to_string(), "validation failed: too short; needs a digit");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_denied_is_generic() {
        assert_eq!(AuthError::Denied.to_string(), "not permitted");
        assert!(!AuthError::Denied.is_server_error());
    }

    #[test]
    fn test_server_errors() {
        assert!(AuthError::Internal("boom".into()).is_server_error());
        assert_eq!(AuthError::Internal("boom".into()).status_code(), 500);
    }
}
