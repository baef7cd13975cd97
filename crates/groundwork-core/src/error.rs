//! Unified application error types for Groundwork.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Authentication failures are built
//! only through [`AppError::unauthenticated`] and
//! [`AppError::invalid_credential`] so that their wording never varies
//! with the underlying cause.

use std::fmt;
use thiserror::Error;

/// Generic message attached to every unauthenticated rejection.
pub const UNAUTHENTICATED_MESSAGE: &str = "Not authenticated";

/// Generic message attached to every failed login or reset attempt.
pub const INVALID_CREDENTIAL_MESSAGE: &str = "Invalid credentials";

/// Generic message attached to every permission denial.
pub const FORBIDDEN_MESSAGE: &str = "Permission denied";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Missing, malformed, expired, revoked, or wrong-type bearer token.
    Unauthenticated,
    /// Valid identity, insufficient permission.
    Forbidden,
    /// Login or password-reset failure.
    InvalidCredential,
    /// Input validation failed.
    Validation,
    /// A uniqueness constraint or concurrent modification conflict.
    Conflict,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::InvalidCredential => write!(f, "INVALID_CREDENTIAL"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Groundwork.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create the generic unauthenticated error.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, UNAUTHENTICATED_MESSAGE)
    }

    /// Create the generic invalid-credential error.
    pub fn invalid_credential() -> Self {
        Self::new(ErrorKind::InvalidCredential, INVALID_CREDENTIAL_MESSAGE)
    }

    /// Create the generic forbidden error.
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden, FORBIDDEN_MESSAGE)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let conflict = match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Some(format!(
                "Unique constraint violated: {}",
                db_err.constraint().unwrap_or("unknown")
            )),
            _ => None,
        };

        match conflict {
            Some(message) => Self::with_source(ErrorKind::Conflict, message, err),
            None => Self::with_source(ErrorKind::Database, format!("Database error: {err}"), err),
        }
    }
}
