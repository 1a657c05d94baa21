//! Error types for typed QAIL queries.

use thiserror::Error;

use crate::ast::StatementKind;

/// The main error type for query construction and rendering.
#[derive(Debug, Error)]
pub enum QailError {
    /// `on` was called while no join was waiting for an ON clause.
    #[error("ON clause without matching JOIN: {message}")]
    OnClauseWithoutMatchingJoin { message: String },

    /// SET assignments were recorded in a statement that is not an UPDATE.
    #[error("SET assignments are only valid in UPDATE, found in {statement}")]
    SetOutsideUpdate { statement: StatementKind },

    /// The finished query has a shape the backend cannot express.
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization of a query failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QailError {
    /// Create an ON-without-JOIN error.
    pub fn unmatched_on(message: impl Into<String>) -> Self {
        Self::OnClauseWithoutMatchingJoin {
            message: message.into(),
        }
    }

    /// Create an invalid statement error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidStatement(message.into())
    }

    /// True for the ON-without-JOIN case.
    pub fn is_unmatched_on(&self) -> bool {
        matches!(self, Self::OnClauseWithoutMatchingJoin { .. })
    }
}

/// Result type alias for QAIL operations.
pub type QailResult<T> = Result<T, QailError>;
