//! Expected-group calculation for one organization.

use std::collections::BTreeSet;

use gs_core::identity::ExpectedGroup;
use gs_core::ids::{GroupId, OrganizationId};
use gs_core::settings::GroupSyncSettings;

use crate::claims::{MergedClaims, extract_group_claims};
use crate::error::ClaimError;

/// Result of evaluating an organization's settings against the claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedGroups {
    /// Sync is off for this organization; its membership must not change.
    Disabled,
    /// Groups the user should be in, always including the everyone group.
    Expected(BTreeSet<ExpectedGroup>),
}

/// Compute the groups the user should be in for one organization.
///
/// # Errors
///
/// Returns `ClaimError` if the configured claim field is malformed.
pub fn expected_groups(
    claims: &MergedClaims,
    settings: &GroupSyncSettings,
    organization_id: &OrganizationId,
) -> Result<ExpectedGroups, ClaimError> {
    if !settings.is_enabled() {
        return Ok(ExpectedGroups::Disabled);
    }
    let values = extract_group_claims(claims, &settings.field)?;
    Ok(ExpectedGroups::Expected(expected_from_values(
        &values,
        settings,
        organization_id,
    )))
}

/// Apply filter and mapping to raw claim values.
///
/// Values failing the filter are dropped. Mapped values expand to every
/// mapped ID; unmapped values are kept by name, unmodified. The everyone
/// group is always added.
#[must_use]
pub fn expected_from_values(
    values: &[String],
    settings: &GroupSyncSettings,
    organization_id: &OrganizationId,
) -> BTreeSet<ExpectedGroup> {
    let mut expected: BTreeSet<ExpectedGroup> = values
        .iter()
        .filter(|value| settings.passes_filter(value))
        .flat_map(|value| match settings.mapping.get(value.as_str()) {
            Some(ids) => ids.iter().cloned().map(ExpectedGroup::Id).collect::<Vec<_>>(),
            None => vec![ExpectedGroup::Name(value.clone())],
        })
        .collect();
    expected.insert(ExpectedGroup::Id(GroupId::everyone(organization_id)));
    expected
}
