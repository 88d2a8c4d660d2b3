//! # gs-idpsync
//!
//! Reconciles a user's organization group memberships with the group claims
//! their identity provider sent at login.
//!
//! - Claim extraction and validation
//! - Per-organization expected groups (filter, mapping, everyone group)
//! - ID-or-name membership diff
//! - Optional creation of groups that do not exist yet
//! - One transactional apply per sync, with whole-invocation retry
//!
//! The engine is written against the contracts in [`store`]; [`db`] provides
//! them for the libSQL store in `gs-db`.

pub mod claims;
pub mod db;
pub mod diff;
pub mod error;
pub mod expected;
pub mod missing;
pub mod plan;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use claims::MergedClaims;
pub use db::StoredPolicyResolver;
pub use error::{ClaimError, SyncError};
pub use plan::{OrgOutcome, SyncPlan, SyncReport};
pub use store::{
    MembershipStore, PolicyResolver, StaticPolicyResolver, StoreError, TransactionScope, UnitOfWork,
};
pub use sync::{GroupParams, GroupSync};
