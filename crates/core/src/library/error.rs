//! Library error types.

use thiserror::Error;

/// Errors that can occur during library operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// A required field was missing or blank.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No student carries this tag.
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    /// No loan transaction has this ID.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(i32),

    /// Unexpected storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LibraryError {
    /// Returns the error code for API responses and logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::StudentNotFound(_) | Self::TransactionNotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Returns true for lookups that matched nothing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound(_) | Self::TransactionNotFound(_))
    }
}
