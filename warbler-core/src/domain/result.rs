//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    /// A unique field (email, username) already exists on another record
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Check if a storage error message reports a violated constraint
pub(crate) fn is_constraint_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("constraint error")
        || lower.contains("violates unique constraint")
        || lower.contains("violates primary key constraint")
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        let msg = err.to_string();
        if is_constraint_error(&msg) {
            Self::ConstraintViolation(msg)
        } else {
            Self::Database(msg)
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
