//! Cross-cutting error types for group sync.
//!
//! Crate-specific errors (`DatabaseError`, `SyncError`, `ConfigError`) live in
//! their own crates. This module only holds errors raised by core types.

use thiserror::Error;

/// Errors that can be raised by core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identifier was empty or otherwise unusable.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// A stored enum value did not match any known variant.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
