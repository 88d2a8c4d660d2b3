//! # gs-core
//!
//! Core types shared across the group sync crates.
//!
//! - Typed identifiers for users, organizations, and groups
//! - Entity structs for organizations and groups as stored
//! - The dual group identity (by ID or by name) and its equivalence rule
//! - Per-organization group sync settings
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod settings;

pub use identity::{ExistingGroup, ExpectedGroup, GroupIdentity, same_group};
pub use ids::{GroupId, OrganizationId, UserId};
pub use settings::GroupSyncSettings;
