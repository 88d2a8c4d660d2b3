//! Resolution of the groups to add into group IDs of the organization.

use std::collections::BTreeSet;

use gs_core::identity::ExpectedGroup;
use gs_core::ids::{GroupId, OrganizationId};

use crate::error::SyncError;
use crate::store::MembershipStore;

/// Turn the groups to add into group IDs of `organization_id`.
///
/// Mapped IDs are kept only if they name a group of this organization. A
/// mapping that points at another organization's group, or at a deleted
/// one, is dropped with a warning.
///
/// Name-only groups matched nothing the user is in, so they either do not
/// exist or the user is simply not a member. Without auto-create they are
/// dropped; with it they are created (or looked up, if they exist) and added.
///
/// # Errors
///
/// Returns `SyncError::GroupLookup` if the mapped IDs cannot be checked and
/// `SyncError::GroupCreation` if the store fails to create groups.
pub async fn resolve_missing_groups<S: MembershipStore>(
    store: &S,
    organization_id: &OrganizationId,
    to_add: Vec<ExpectedGroup>,
    auto_create: bool,
) -> Result<BTreeSet<GroupId>, SyncError> {
    let mut mapped = Vec::new();
    let mut names = Vec::new();
    for expected in to_add {
        match expected {
            ExpectedGroup::Id(id) => mapped.push(id),
            ExpectedGroup::Name(name) => names.push(name),
        }
    }

    let mut ids = BTreeSet::new();
    if !mapped.is_empty() {
        ids = store
            .groups_in_organization(organization_id, &mapped)
            .await
            .map_err(|e| SyncError::GroupLookup {
                organization_id: organization_id.clone(),
                source: Box::new(e),
            })?;
        let foreign: Vec<&GroupId> = mapped.iter().filter(|id| !ids.contains(*id)).collect();
        if !foreign.is_empty() {
            tracing::warn!(
                %organization_id,
                group_ids = ?foreign,
                "ignoring mapped group IDs that are not groups of this organization"
            );
        }
    }

    if names.is_empty() {
        return Ok(ids);
    }

    if !auto_create {
        tracing::debug!(
            %organization_id,
            dropped = names.len(),
            "ignoring claim groups that do not exist, auto create is off"
        );
        return Ok(ids);
    }

    let created = store
        .insert_missing_groups(organization_id, &names)
        .await
        .map_err(|e| SyncError::GroupCreation {
            organization_id: organization_id.clone(),
            source: Box::new(e),
        })?;
    ids.extend(created.into_iter().map(|(_, id)| id));
    Ok(ids)
}
