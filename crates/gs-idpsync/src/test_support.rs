//! In-memory store with fault injection for orchestrator tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use gs_core::entities::EVERYONE_GROUP_NAME;
use gs_core::identity::ExistingGroup;
use gs_core::ids::{GroupId, OrganizationId, UserId};
use gs_core::settings::GroupSyncSettings;
use serde_json::Value;

use crate::claims::MergedClaims;
use crate::store::{MembershipStore, PolicyResolver, StoreError, TransactionScope, UnitOfWork};

#[derive(Debug, thiserror::Error)]
#[error("memory store: {message}")]
pub struct MemoryError {
    message: &'static str,
    transient: bool,
}

impl MemoryError {
    const fn permanent(message: &'static str) -> Self {
        Self {
            message,
            transient: false,
        }
    }

    const fn transient(message: &'static str) -> Self {
        Self {
            message,
            transient: true,
        }
    }
}

impl StoreError for MemoryError {
    fn is_transient(&self) -> bool {
        self.transient
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    next_id: u32,
    groups: BTreeMap<GroupId, (OrganizationId, String)>,
    members: BTreeSet<(UserId, GroupId)>,
}

impl State {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn group_named(&self, organization_id: &OrganizationId, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, (org, n))| org == organization_id && n == name)
            .map(|(id, _)| id.clone())
    }
}

#[derive(Debug, Default)]
struct Faults {
    begin: bool,
    group_lookup: bool,
    group_creation: bool,
    set_user_groups: bool,
    commits: u32,
}

#[derive(Debug, Default)]
struct Counters {
    commit_attempts: u32,
    commits: u32,
    rollbacks: u32,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    faults: Mutex<Faults>,
    counters: Mutex<Counters>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap()
}

/// Committed state shared by every transaction.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_organization(&self, _name: &str) -> OrganizationId {
        let mut state = lock(&self.shared.state);
        let id = OrganizationId::from(state.next("org"));
        state.groups.insert(
            GroupId::everyone(&id),
            (id.clone(), EVERYONE_GROUP_NAME.to_string()),
        );
        id
    }

    pub fn add_group(&self, organization_id: &OrganizationId, name: &str) -> GroupId {
        let mut state = lock(&self.shared.state);
        let id = GroupId::from(state.next("grp"));
        state
            .groups
            .insert(id.clone(), (organization_id.clone(), name.to_string()));
        id
    }

    pub fn add_member(&self, user_id: &UserId, group_id: &GroupId) {
        lock(&self.shared.state)
            .members
            .insert((user_id.clone(), group_id.clone()));
    }

    pub fn user_groups(&self, user_id: &UserId) -> BTreeSet<GroupId> {
        lock(&self.shared.state)
            .members
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, g)| g.clone())
            .collect()
    }

    pub fn group_named(&self, organization_id: &OrganizationId, name: &str) -> Option<GroupId> {
        lock(&self.shared.state).group_named(organization_id, name)
    }

    pub fn fail_begin(&self) {
        lock(&self.shared.faults).begin = true;
    }

    pub fn fail_group_lookup(&self) {
        lock(&self.shared.faults).group_lookup = true;
    }

    pub fn fail_group_creation(&self) {
        lock(&self.shared.faults).group_creation = true;
    }

    pub fn fail_set_user_groups(&self) {
        lock(&self.shared.faults).set_user_groups = true;
    }

    /// Fail the next `n` commits as if another writer held the lock.
    pub fn fail_next_commits(&self, n: u32) {
        lock(&self.shared.faults).commits = n;
    }

    pub fn commits(&self) -> u32 {
        lock(&self.shared.counters).commits
    }

    pub fn commit_attempts(&self) -> u32 {
        lock(&self.shared.counters).commit_attempts
    }

    pub fn rollbacks(&self) -> u32 {
        lock(&self.shared.counters).rollbacks
    }
}

impl UnitOfWork for MemoryStore {
    type Tx = MemoryTx;
    type Error = MemoryError;

    async fn begin(&self) -> Result<MemoryTx, MemoryError> {
        if lock(&self.shared.faults).begin {
            return Err(MemoryError::permanent("begin failed"));
        }
        let snapshot = lock(&self.shared.state).clone();
        Ok(MemoryTx {
            shared: Arc::clone(&self.shared),
            state: Mutex::new(snapshot),
        })
    }
}

/// A private copy of the store, written back on commit.
#[derive(Debug)]
pub struct MemoryTx {
    shared: Arc<Shared>,
    state: Mutex<State>,
}

impl MemoryTx {
    pub fn group_named(&self, organization_id: &OrganizationId, name: &str) -> Option<GroupId> {
        lock(&self.state).group_named(organization_id, name)
    }
}

impl MembershipStore for MemoryTx {
    type Error = MemoryError;

    async fn get_groups(&self, user_id: &UserId) -> Result<Vec<ExistingGroup>, MemoryError> {
        let state = lock(&self.state);
        Ok(state
            .members
            .iter()
            .filter(|(u, _)| u == user_id)
            .filter_map(|(_, g)| {
                state.groups.get(g).map(|(org, name)| ExistingGroup {
                    id: g.clone(),
                    name: name.clone(),
                    organization_id: org.clone(),
                    is_everyone: g.as_str() == org.as_str(),
                })
            })
            .collect())
    }

    async fn groups_in_organization(
        &self,
        organization_id: &OrganizationId,
        ids: &[GroupId],
    ) -> Result<BTreeSet<GroupId>, MemoryError> {
        if lock(&self.shared.faults).group_lookup {
            return Err(MemoryError::permanent("group lookup failed"));
        }
        let state = lock(&self.state);
        Ok(ids
            .iter()
            .filter(|id| state.groups.get(*id).is_some_and(|(org, _)| org == organization_id))
            .cloned()
            .collect())
    }

    async fn insert_missing_groups(
        &self,
        organization_id: &OrganizationId,
        names: &[String],
    ) -> Result<Vec<(String, GroupId)>, MemoryError> {
        if lock(&self.shared.faults).group_creation {
            return Err(MemoryError::permanent("group creation failed"));
        }
        let mut state = lock(&self.state);
        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let id = if let Some(id) = state.group_named(organization_id, name) {
                id
            } else {
                let id = GroupId::from(state.next("grp"));
                state
                    .groups
                    .insert(id.clone(), (organization_id.clone(), name.clone()));
                id
            };
            resolved.push((name.clone(), id));
        }
        Ok(resolved)
    }

    async fn set_user_groups(
        &self,
        user_id: &UserId,
        add: &[GroupId],
        remove: &[GroupId],
    ) -> Result<(), MemoryError> {
        if lock(&self.shared.faults).set_user_groups {
            return Err(MemoryError::permanent("membership write failed"));
        }
        let mut state = lock(&self.state);
        for id in add {
            state.members.insert((user_id.clone(), id.clone()));
        }
        for id in remove {
            state.members.remove(&(user_id.clone(), id.clone()));
        }
        Ok(())
    }
}

impl TransactionScope for MemoryTx {
    type Error = MemoryError;

    async fn commit(self) -> Result<(), MemoryError> {
        {
            let mut faults = lock(&self.shared.faults);
            lock(&self.shared.counters).commit_attempts += 1;
            if faults.commits > 0 {
                faults.commits -= 1;
                return Err(MemoryError::transient("commit failed, store busy"));
            }
        }
        let state = self.state.into_inner().unwrap();
        *lock(&self.shared.state) = state;
        lock(&self.shared.counters).commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), MemoryError> {
        lock(&self.shared.counters).rollbacks += 1;
        Ok(())
    }
}

/// Wraps a resolver and fails for one organization.
#[derive(Debug, Clone)]
pub struct FailingResolver<R> {
    inner: R,
    failing: OrganizationId,
}

impl<R> FailingResolver<R> {
    pub const fn new(inner: R, failing: OrganizationId) -> Self {
        Self { inner, failing }
    }
}

impl<S, R> PolicyResolver<S> for FailingResolver<R>
where
    S: ?Sized,
    R: PolicyResolver<S>,
{
    type Error = MemoryError;

    async fn resolve(
        &self,
        store: &S,
        organization_id: &OrganizationId,
    ) -> Result<GroupSyncSettings, MemoryError> {
        if *organization_id == self.failing {
            return Err(MemoryError::permanent("settings unavailable"));
        }
        self.inner
            .resolve(store, organization_id)
            .await
            .map_err(|_| MemoryError::permanent("inner resolver failed"))
    }
}

/// Merged claims from a JSON object literal.
pub fn claims(value: Value) -> MergedClaims {
    match value {
        Value::Object(map) => map,
        other => panic!("claims must be a JSON object, got {other}"),
    }
}
