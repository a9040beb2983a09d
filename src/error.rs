//! Error types for Anonce.

use thiserror::Error;

use crate::rpc::ErrorKind;

/// Common error type for Anonce.
#[derive(Error, Debug)]
pub enum AnonceError {
    /// Database error.
    ///
    /// Wraps any sqlx error that is not a uniqueness violation.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (bad credentials, bad password).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// The resource already exists or the operation conflicts with its state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The voting service could not be reached or replied with garbage.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// A failure reported by the voting service.
    #[error("{message}")]
    Remote {
        /// Error category reported by the remote side.
        kind: ErrorKind,
        /// Human-readable message from the remote side.
        message: String,
    },

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AnonceError {
    /// Message without the category prefix, suitable for API clients.
    pub fn public_message(&self) -> String {
        match self {
            AnonceError::Auth(msg)
            | AnonceError::Permission(msg)
            | AnonceError::Validation(msg)
            | AnonceError::Conflict(msg) => msg.clone(),
            AnonceError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AnonceError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AnonceError::Conflict(db_err.message().to_string());
            }
        }
        AnonceError::Database(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for AnonceError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AnonceError::Internal(format!("password hashing failed: {e}"))
    }
}

/// Result type alias for Anonce operations.
pub type Result<T> = std::result::Result<T, AnonceError>;
