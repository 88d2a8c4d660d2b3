//! The sync orchestrator.
//!
//! One invocation runs inside one unit of work:
//!
//! ```text
//! begin → load membership → group by organization → resolve every policy
//!       → per organization: expected set → diff → resolve missing groups
//!       → fold fragments into one plan → apply → commit
//! ```
//!
//! Policy, group creation, and write failures roll everything back. A
//! malformed claim only skips the organization it was read for.

use std::collections::{BTreeMap, BTreeSet};

use gs_config::SyncConfig;
use gs_core::identity::ExistingGroup;
use gs_core::ids::{GroupId, OrganizationId, UserId};
use gs_core::settings::GroupSyncSettings;
use gs_db::retry::RetryConfig;

use crate::claims::MergedClaims;
use crate::diff::diff_memberships;
use crate::error::SyncError;
use crate::expected::{ExpectedGroups, expected_groups};
use crate::missing::resolve_missing_groups;
use crate::plan::{OrgOutcome, OrgPlan, SyncPlan, SyncReport};
use crate::store::{MembershipStore, PolicyResolver, StoreError, TransactionScope, UnitOfWork};

/// Inputs of one sync invocation, produced at login.
#[derive(Debug, Clone, Default)]
pub struct GroupParams {
    /// When false the invocation does nothing.
    pub sync_enabled: bool,
    pub merged_claims: MergedClaims,
}

/// Group sync engine, parameterized by how organization settings are resolved.
#[derive(Debug, Clone)]
pub struct GroupSync<R> {
    resolver: R,
    enabled: bool,
}

enum OrgStep {
    Planned(OrgPlan),
    Skipped(OrgOutcome),
}

impl<R> GroupSync<R> {
    #[must_use]
    pub const fn new(resolver: R) -> Self {
        Self {
            resolver,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub const fn from_config(resolver: R, config: &SyncConfig) -> Self {
        Self {
            resolver,
            enabled: config.enabled,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Package the login's merged claims for [`Self::sync_groups`].
    #[must_use]
    pub fn parse_group_claims(&self, merged_claims: MergedClaims) -> GroupParams {
        GroupParams {
            sync_enabled: self.enabled,
            merged_claims,
        }
    }

    /// Reconcile the user's groups with the claims in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if any fatal step fails. The transaction is rolled
    /// back and no membership change is applied.
    pub async fn sync_groups<U>(
        &self,
        store: &U,
        user_id: &UserId,
        params: &GroupParams,
    ) -> Result<SyncReport, SyncError>
    where
        U: UnitOfWork,
        R: PolicyResolver<U::Tx>,
    {
        if !params.sync_enabled {
            tracing::debug!(%user_id, "group sync disabled, skipping");
            return Ok(SyncReport::default());
        }

        let tx = store.begin().await.map_err(|e| SyncError::Transaction {
            transient: e.is_transient(),
            source: Box::new(e),
        })?;

        match self.reconcile(&tx, user_id, &params.merged_claims).await {
            Ok(report) => {
                tx.commit().await.map_err(|e| SyncError::Commit {
                    user_id: user_id.clone(),
                    transient: e.is_transient(),
                    source: Box::new(e),
                })?;
                if !report.plan.is_empty() {
                    tracing::info!(
                        %user_id,
                        added = report.plan.add_group_ids.len(),
                        removed = report.plan.remove_group_ids.len(),
                        "group memberships synced"
                    );
                }
                Ok(report)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(%user_id, error = %rollback_err, "group sync rollback failed");
                }
                Err(err)
            }
        }
    }

    /// [`Self::sync_groups`], re-run from scratch on retryable failures.
    ///
    /// # Errors
    ///
    /// Returns the last `SyncError` once attempts are exhausted, or the first
    /// non-retryable one.
    pub async fn sync_groups_with_retry<U>(
        &self,
        store: &U,
        user_id: &UserId,
        params: &GroupParams,
        retry: &RetryConfig,
    ) -> Result<SyncReport, SyncError>
    where
        U: UnitOfWork,
        R: PolicyResolver<U::Tx>,
    {
        let mut attempt = 1;
        loop {
            match self.sync_groups(store, user_id, params).await {
                Err(err) if err.is_retryable() && attempt < retry.max_attempts => {
                    let delay = retry.delay_after(attempt);
                    tracing::warn!(
                        %user_id,
                        attempt,
                        max_attempts = retry.max_attempts,
                        ?delay,
                        error = %err,
                        "group sync failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Compute and apply the plan on an already open transaction.
    ///
    /// Does not commit.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` for every fatal failure; claim errors are reported
    /// in the returned `SyncReport` instead.
    pub async fn reconcile<S>(
        &self,
        store: &S,
        user_id: &UserId,
        claims: &MergedClaims,
    ) -> Result<SyncReport, SyncError>
    where
        S: MembershipStore,
        R: PolicyResolver<S>,
    {
        let current = store
            .get_groups(user_id)
            .await
            .map_err(|e| SyncError::Membership {
                user_id: user_id.clone(),
                source: Box::new(e),
            })?;
        let by_org = group_by_organization(current);
        if by_org.is_empty() {
            tracing::debug!(%user_id, "user belongs to no organizations, nothing to sync");
            return Ok(SyncReport::default());
        }

        let mut policies = Vec::with_capacity(by_org.len());
        for (organization_id, existing) in by_org {
            let settings = self
                .resolver
                .resolve(store, &organization_id)
                .await
                .map_err(|e| SyncError::PolicyResolution {
                    organization_id: organization_id.clone(),
                    source: Box::new(e),
                })?;
            policies.push((organization_id, existing, settings));
        }

        let mut fragments = Vec::new();
        let mut outcomes = Vec::with_capacity(policies.len());
        for (organization_id, existing, settings) in policies {
            match plan_organization(store, &organization_id, &existing, &settings, claims).await? {
                OrgStep::Planned(fragment) => {
                    outcomes.push(fragment.outcome());
                    fragments.push(fragment);
                }
                OrgStep::Skipped(outcome) => outcomes.push(outcome),
            }
        }

        let plan: SyncPlan = fragments.into_iter().collect();
        if !plan.is_empty() {
            let add: Vec<GroupId> = plan.add_group_ids.iter().cloned().collect();
            let remove: Vec<GroupId> = plan.remove_group_ids.iter().cloned().collect();
            store
                .set_user_groups(user_id, &add, &remove)
                .await
                .map_err(|e| SyncError::Commit {
                    user_id: user_id.clone(),
                    transient: e.is_transient(),
                    source: Box::new(e),
                })?;
        }

        Ok(SyncReport {
            plan,
            organizations: outcomes,
        })
    }
}

fn group_by_organization(groups: Vec<ExistingGroup>) -> BTreeMap<OrganizationId, Vec<ExistingGroup>> {
    let mut by_org: BTreeMap<OrganizationId, Vec<ExistingGroup>> = BTreeMap::new();
    for group in groups {
        by_org
            .entry(group.organization_id.clone())
            .or_default()
            .push(group);
    }
    by_org
}

async fn plan_organization<S: MembershipStore>(
    store: &S,
    organization_id: &OrganizationId,
    existing: &[ExistingGroup],
    settings: &GroupSyncSettings,
    claims: &MergedClaims,
) -> Result<OrgStep, SyncError> {
    let expected = match expected_groups(claims, settings, organization_id) {
        Ok(ExpectedGroups::Expected(expected)) => expected,
        Ok(ExpectedGroups::Disabled) => {
            tracing::debug!(%organization_id, "group sync disabled for organization");
            return Ok(OrgStep::Skipped(OrgOutcome::Disabled {
                organization_id: organization_id.clone(),
            }));
        }
        Err(err) => {
            tracing::warn!(
                %organization_id,
                field = %settings.field,
                error = %err,
                "failed to parse group claims, skipping organization"
            );
            return Ok(OrgStep::Skipped(OrgOutcome::ClaimError {
                organization_id: organization_id.clone(),
                error: err.to_string(),
            }));
        }
    };

    let diff = diff_memberships(existing, &expected);

    let (protected, removable): (Vec<_>, Vec<_>) =
        diff.to_remove.into_iter().partition(|group| group.is_everyone);
    if !protected.is_empty() {
        tracing::debug!(%organization_id, "everyone group is never removed by sync");
    }
    let remove: BTreeSet<GroupId> = removable.into_iter().map(|group| group.id).collect();

    let add = resolve_missing_groups(
        store,
        organization_id,
        diff.to_add,
        settings.auto_create_missing_groups,
    )
    .await?;

    tracing::debug!(
        %organization_id,
        add = add.len(),
        remove = remove.len(),
        "organization plan computed"
    );
    Ok(OrgStep::Planned(OrgPlan {
        organization_id: organization_id.clone(),
        add,
        remove,
    }))
}
