//! Errors raised by the membership store.

use thiserror::Error;

use crate::retry::is_transient_error;

/// Errors from membership store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Schema setup or connection configuration failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// A lookup by ID matched no row.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A stored value could not be decoded (bad timestamp, unknown enum,
    /// malformed settings JSON).
    #[error("corrupt {0}")]
    CorruptRow(String),

    /// Settings could not be encoded for storage.
    #[error("encode sync settings: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying libSQL error, including lock contention and constraint
    /// violations.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the failure is lock contention that may clear if the whole
    /// unit of work is re-run. Constraint and decoding errors are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::LibSql(e) if is_transient_error(e))
    }
}
