//! Per-organization plan fragments, the aggregated plan, and the sync report.

use std::collections::BTreeSet;

use gs_core::ids::{GroupId, OrganizationId};
use serde::Serialize;

/// Membership changes computed for one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgPlan {
    pub organization_id: OrganizationId,
    pub add: BTreeSet<GroupId>,
    pub remove: BTreeSet<GroupId>,
}

impl OrgPlan {
    #[must_use]
    pub fn outcome(&self) -> OrgOutcome {
        OrgOutcome::Synced {
            organization_id: self.organization_id.clone(),
            added: self.add.len(),
            removed: self.remove.len(),
        }
    }
}

/// Membership changes for one user across all organizations.
///
/// Group IDs are globally unique, so fragments merge by plain set union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub add_group_ids: BTreeSet<GroupId>,
    pub remove_group_ids: BTreeSet<GroupId>,
}

impl SyncPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add_group_ids.is_empty() && self.remove_group_ids.is_empty()
    }

    #[must_use]
    pub fn merge(mut self, fragment: OrgPlan) -> Self {
        self.add_group_ids.extend(fragment.add);
        self.remove_group_ids.extend(fragment.remove);
        self
    }
}

impl FromIterator<OrgPlan> for SyncPlan {
    fn from_iter<I: IntoIterator<Item = OrgPlan>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::merge)
    }
}

/// What happened to one organization during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrgOutcome {
    Synced {
        organization_id: OrganizationId,
        added: usize,
        removed: usize,
    },
    /// Sync is off for the organization; membership left alone.
    Disabled { organization_id: OrganizationId },
    /// The group claim was malformed; membership left alone this time.
    ClaimError {
        organization_id: OrganizationId,
        error: String,
    },
}

/// Result of one sync invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub plan: SyncPlan,
    pub organizations: Vec<OrgOutcome>,
}
