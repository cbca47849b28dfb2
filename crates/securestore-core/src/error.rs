//! Unified application error types for SecureStore.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input validation failed (empty path, non-positive TTL, ...).
    Validation,
    /// The requested record was not found.
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// No share link exists for the supplied token.
    InvalidLink,
    /// The share link is past its expiry.
    Expired,
    /// The share link is password protected and no password was supplied.
    PasswordRequired,
    /// The supplied share-link password did not verify.
    InvalidPassword,
    /// Encryption or decryption failed.
    Crypto,
    /// The caller could not be authenticated.
    Unauthorized,
    /// The record store failed.
    Database,
    /// The blob store failed.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind represents a failure of one of the backing stores.
    ///
    /// Background sweeps treat these as retryable on the next tick.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Database | Self::Storage)
    }

    /// Whether this kind is one of the share-access rejections.
    pub fn is_share_access(&self) -> bool {
        matches!(
            self,
            Self::InvalidLink | Self::Expired | Self::PasswordRequired | Self::InvalidPassword
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::InvalidLink => write!(f, "INVALID_LINK"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::PasswordRequired => write!(f, "PASSWORD_REQUIRED"),
            Self::InvalidPassword => write!(f, "INVALID_PASSWORD"),
            Self::Crypto => write!(f, "CRYPTO"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout SecureStore.
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

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an invalid-link error.
    pub fn invalid_link() -> Self {
        Self::new(ErrorKind::InvalidLink, "invalid share link")
    }

    /// Create an expired-link error.
    pub fn expired() -> Self {
        Self::new(ErrorKind::Expired, "share link expired")
    }

    /// Create a password-required error.
    pub fn password_required() -> Self {
        Self::new(ErrorKind::PasswordRequired, "password_required")
    }

    /// Create an invalid-password error.
    pub fn invalid_password() -> Self {
        Self::new(ErrorKind::InvalidPassword, "invalid password")
    }

    /// Create a crypto error.
    ///
    /// The message is fixed so callers cannot tell a tampered blob from a
    /// wrong key.
    pub fn crypto(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::with_source(ErrorKind::Crypto, "decryption failed", source)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
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

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
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
