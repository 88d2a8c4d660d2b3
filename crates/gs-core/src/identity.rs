//! Group identities and the ID-or-name equivalence rule.
//!
//! A group the user *should* be in is known either by its stable ID (resolved
//! through a configured mapping) or only by name (taken from a raw claim). A
//! group the user *is* in always carries both. Renaming a group must not break
//! a configured mapping, so IDs are compared first and names only when either
//! side lacks an ID.

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, OrganizationId};

/// Anything that can be compared under the ID-or-name rule.
pub trait GroupIdentity {
    fn group_id(&self) -> Option<&GroupId>;
    fn group_name(&self) -> Option<&str>;
}

/// Whether two identities refer to the same group.
///
/// - Both carry IDs: equal iff the IDs are equal (names are ignored).
/// - Otherwise both carry names: equal iff the names are equal.
/// - Otherwise: not equal.
#[must_use]
pub fn same_group(a: &impl GroupIdentity, b: &impl GroupIdentity) -> bool {
    if let (Some(a_id), Some(b_id)) = (a.group_id(), b.group_id()) {
        return a_id == b_id;
    }
    if let (Some(a_name), Some(b_name)) = (a.group_name(), b.group_name()) {
        return a_name == b_name;
    }
    false
}

/// A group the user is expected to belong to after sync.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedGroup {
    /// Fully resolved through a mapping or the everyone group.
    Id(GroupId),
    /// Unresolved raw claim value; may or may not exist yet.
    Name(String),
}

impl GroupIdentity for ExpectedGroup {
    fn group_id(&self) -> Option<&GroupId> {
        match self {
            Self::Id(id) => Some(id),
            Self::Name(_) => None,
        }
    }

    fn group_name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

/// A group the user currently belongs to, as loaded from the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExistingGroup {
    pub id: GroupId,
    pub name: String,
    pub organization_id: OrganizationId,
    pub is_everyone: bool,
}

impl GroupIdentity for ExistingGroup {
    fn group_id(&self) -> Option<&GroupId> {
        Some(&self.id)
    }

    fn group_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}
