//! Contracts for the collaborators the sync engine runs against.
//!
//! Every method is called on the transaction handle of one unit of work, so
//! reads, group creation, and membership writes share one snapshot and are
//! applied or discarded together.

use std::collections::{BTreeMap, BTreeSet};

use gs_core::identity::ExistingGroup;
use gs_core::ids::{GroupId, OrganizationId, UserId};
use gs_core::settings::GroupSyncSettings;

/// Error raised by a store, able to tell whether it came from contention.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
    /// True when the same work may succeed if run again, such as a lock
    /// held by another writer. Constraint violations and corrupt data are
    /// never transient.
    fn is_transient(&self) -> bool {
        false
    }
}

/// Reads and writes group membership inside a transaction.
#[allow(async_fn_in_trait)]
pub trait MembershipStore {
    type Error: StoreError;

    /// Every group the user currently belongs to, across organizations.
    async fn get_groups(&self, user_id: &UserId) -> Result<Vec<ExistingGroup>, Self::Error>;

    /// The subset of `ids` that name groups of `organization_id`.
    async fn groups_in_organization(
        &self,
        organization_id: &OrganizationId,
        ids: &[GroupId],
    ) -> Result<BTreeSet<GroupId>, Self::Error>;

    /// Create the named groups where missing and return `(name, id)` for
    /// each. A name that already exists resolves to the existing group.
    async fn insert_missing_groups(
        &self,
        organization_id: &OrganizationId,
        names: &[String],
    ) -> Result<Vec<(String, GroupId)>, Self::Error>;

    /// Add the user to `add` and remove them from `remove`.
    async fn set_user_groups(
        &self,
        user_id: &UserId,
        add: &[GroupId],
        remove: &[GroupId],
    ) -> Result<(), Self::Error>;
}

/// Resolves an organization's sync settings, reading through `store` so the
/// result is consistent with the enclosing transaction.
#[allow(async_fn_in_trait)]
pub trait PolicyResolver<S: ?Sized> {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn resolve(
        &self,
        store: &S,
        organization_id: &OrganizationId,
    ) -> Result<GroupSyncSettings, Self::Error>;
}

/// End of a unit of work.
#[allow(async_fn_in_trait)]
pub trait TransactionScope: Sized {
    type Error: StoreError;

    async fn commit(self) -> Result<(), Self::Error>;
    async fn rollback(self) -> Result<(), Self::Error>;
}

/// Starts units of work against the shared membership store.
#[allow(async_fn_in_trait)]
pub trait UnitOfWork {
    type Tx: MembershipStore + TransactionScope;
    type Error: StoreError;

    async fn begin(&self) -> Result<Self::Tx, Self::Error>;
}

/// Fixed per-organization settings, independent of the store.
///
/// Organizations without an entry resolve to disabled settings.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyResolver {
    settings: BTreeMap<OrganizationId, GroupSyncSettings>,
}

impl StaticPolicyResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, organization_id: OrganizationId, settings: GroupSyncSettings) -> Self {
        self.settings.insert(organization_id, settings);
        self
    }
}

impl<S: ?Sized> PolicyResolver<S> for StaticPolicyResolver {
    type Error = std::convert::Infallible;

    async fn resolve(
        &self,
        _store: &S,
        organization_id: &OrganizationId,
    ) -> Result<GroupSyncSettings, Self::Error> {
        Ok(self
            .settings
            .get(organization_id)
            .cloned()
            .unwrap_or_default())
    }
}
