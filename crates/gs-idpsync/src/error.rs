//! Error types for group sync.

use gs_core::ids::{OrganizationId, UserId};
use thiserror::Error;

/// Boxed error from a store or resolver implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A group claim that is present but not usable.
///
/// Never fatal: the affected organization is skipped for this sync.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("invalid claim type: expected an array of strings, got {found}")]
    UnexpectedType { found: &'static str },

    #[error("invalid claim type: element {index} expected a string, got {found}")]
    NonStringElement { index: usize, found: &'static str },

    #[error(
        "invalid claim type: got a comma separated string ({0:?}), the IDP should send an array of strings instead"
    )]
    CommaSeparated(String),
}

/// Errors that abort a sync invocation. No membership change is applied.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The user's current groups could not be loaded.
    #[error("load groups for user {user_id}")]
    Membership {
        user_id: UserId,
        #[source]
        source: BoxError,
    },

    /// Settings for one organization could not be resolved.
    #[error("resolve group sync settings for organization {organization_id}")]
    PolicyResolution {
        organization_id: OrganizationId,
        #[source]
        source: BoxError,
    },

    /// Checking which mapped group IDs belong to the organization failed.
    #[error("look up mapped groups in organization {organization_id}")]
    GroupLookup {
        organization_id: OrganizationId,
        #[source]
        source: BoxError,
    },

    /// Auto-creating missing groups failed.
    #[error("create missing groups in organization {organization_id}")]
    GroupCreation {
        organization_id: OrganizationId,
        #[source]
        source: BoxError,
    },

    /// The unit of work could not be started.
    #[error("begin group sync transaction")]
    Transaction {
        transient: bool,
        #[source]
        source: BoxError,
    },

    /// The membership changes could not be applied or committed.
    #[error("apply group changes for user {user_id}")]
    Commit {
        user_id: UserId,
        transient: bool,
        #[source]
        source: BoxError,
    },
}

impl SyncError {
    /// Whether re-running the whole invocation may succeed.
    ///
    /// Only transaction and commit failures the store reported as transient
    /// (lock contention) are retryable. Constraint violations, configuration
    /// and data errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transaction { transient: true, .. } | Self::Commit { transient: true, .. }
        )
    }
}
