//! Error types for pods-orbit
//!
//! Every failure aborts the run and is returned to the caller; nothing in
//! the import retries on its own.

use thiserror::Error;

/// How serious an import failure is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Remote/transient trouble; the caller may simply try again later
    Minor,
    /// Local misconfiguration, invalid input or storage failure
    Major,
}

/// Import error type
#[derive(Debug, Error)]
pub enum ImportError {
    /// Transport failure, non-2xx response or undecodable body from the remote API
    #[error("Fetch failed: {cause}")]
    Fetch { cause: String },

    /// A decision outside the fixed resolution menu
    #[error("Invalid choice: {0}")]
    Validation(String),

    /// Note store failure
    #[error("Store error: {0}")]
    Store(#[from] pods_common::Error),

    /// Missing or invalid pod configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal I/O failure while asking for a decision
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub fn fetch(cause: impl ToString) -> Self {
        Self::Fetch {
            cause: cause.to_string(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Fetch { .. } => ErrorSeverity::Minor,
            _ => ErrorSeverity::Major,
        }
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
