//! Sync contracts implemented over the libSQL membership store.

use std::collections::BTreeSet;

use gs_core::identity::ExistingGroup;
use gs_core::ids::{GroupId, OrganizationId, UserId};
use gs_core::settings::GroupSyncSettings;
use gs_db::error::DatabaseError;
use gs_db::{GsDb, GsTx};

use crate::store::{MembershipStore, PolicyResolver, StoreError, TransactionScope, UnitOfWork};

impl StoreError for DatabaseError {
    fn is_transient(&self) -> bool {
        Self::is_transient(self)
    }
}

impl MembershipStore for GsTx {
    type Error = DatabaseError;

    async fn get_groups(&self, user_id: &UserId) -> Result<Vec<ExistingGroup>, Self::Error> {
        self.get_user_groups(user_id).await
    }

    async fn groups_in_organization(
        &self,
        organization_id: &OrganizationId,
        ids: &[GroupId],
    ) -> Result<BTreeSet<GroupId>, Self::Error> {
        Self::groups_in_organization(self, organization_id, ids).await
    }

    async fn insert_missing_groups(
        &self,
        organization_id: &OrganizationId,
        names: &[String],
    ) -> Result<Vec<(String, GroupId)>, Self::Error> {
        Self::insert_missing_groups(self, organization_id, names).await
    }

    async fn set_user_groups(
        &self,
        user_id: &UserId,
        add: &[GroupId],
        remove: &[GroupId],
    ) -> Result<(), Self::Error> {
        Self::set_user_groups(self, user_id, add, remove).await
    }
}

impl TransactionScope for GsTx {
    type Error = DatabaseError;

    async fn commit(self) -> Result<(), Self::Error> {
        Self::commit(self).await
    }

    async fn rollback(self) -> Result<(), Self::Error> {
        Self::rollback(self).await
    }
}

impl UnitOfWork for GsDb {
    type Tx = GsTx;
    type Error = DatabaseError;

    async fn begin(&self) -> Result<GsTx, Self::Error> {
        Self::begin(self).await
    }
}

/// Reads each organization's settings from the store, inside the sync's
/// transaction. Organizations never configured resolve to disabled settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredPolicyResolver;

impl PolicyResolver<GsTx> for StoredPolicyResolver {
    type Error = DatabaseError;

    async fn resolve(
        &self,
        store: &GsTx,
        organization_id: &OrganizationId,
    ) -> Result<GroupSyncSettings, Self::Error> {
        Ok(store
            .get_sync_settings(organization_id)
            .await?
            .unwrap_or_default())
    }
}
