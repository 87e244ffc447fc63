//! Common error types for pods

use thiserror::Error;

/// Common result type for pod operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across pod crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A node with the same name already exists in the vault
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
