//! Repository Module
//!
//! Per-entity persistence functions over the shared [`sqlx::SqlitePool`].
//! Repositories own the SQL and the business invariants that belong to a
//! single write path (duplicate checks, the disposal balance guard);
//! cross-entity workflows live in the domain modules.

// Auth / access control
pub mod module;
pub mod user;

// Inventory
pub mod ledger;
pub mod subscription;

// Livestock
pub mod cattle;
pub mod livestock;
pub mod riding;
pub mod site;

// Tasks & time tracking
pub mod task;
pub mod timesheet;

#[cfg(test)]
pub mod test_support;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Disposal exceeds the current ledger balance
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
