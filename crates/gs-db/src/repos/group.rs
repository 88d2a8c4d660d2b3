//! Group repository, including race-safe creation of groups named by claims.

use std::collections::BTreeSet;

use chrono::Utc;

use gs_core::entities::Group;
use gs_core::enums::GroupSource;
use gs_core::ids::{GroupId, OrganizationId, PREFIX_GROUP};

use crate::GsTx;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_source, placeholders, positional_ids};

const GROUP_COLUMNS: &str = "id, organization_id, name, source, created_at";

fn row_to_group(row: &libsql::Row) -> Result<Group, DatabaseError> {
    Ok(Group {
        id: GroupId::from(row.get::<String>(0)?),
        organization_id: OrganizationId::from(row.get::<String>(1)?),
        name: row.get::<String>(2)?,
        source: parse_source(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl GsTx {
    pub async fn create_group(
        &self,
        organization_id: &OrganizationId,
        name: &str,
        source: GroupSource,
    ) -> Result<Group, DatabaseError> {
        let now = Utc::now();
        let id = GroupId::from(self.generate_id(PREFIX_GROUP).await?);

        self.conn()
            .execute(
                "INSERT INTO groups (id, organization_id, name, source, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    organization_id.as_str(),
                    name,
                    source.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Group {
            id,
            organization_id: organization_id.clone(),
            name: name.to_string(),
            source,
            created_at: now,
        })
    }

    pub async fn get_group(&self, id: &GroupId) -> Result<Group, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = ?1"),
                [id.as_str()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("group", id))?;
        row_to_group(&row)
    }

    pub async fn get_group_by_name(
        &self,
        organization_id: &OrganizationId,
        name: &str,
    ) -> Result<Option<Group>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {GROUP_COLUMNS} FROM groups WHERE organization_id = ?1 AND name = ?2"
                ),
                libsql::params![organization_id.as_str(), name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_group(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_groups(&self, organization_id: &OrganizationId) -> Result<Vec<Group>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {GROUP_COLUMNS} FROM groups WHERE organization_id = ?1 ORDER BY name"
                ),
                [organization_id.as_str()],
            )
            .await?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next().await? {
            groups.push(row_to_group(&row)?);
        }
        Ok(groups)
    }

    /// The subset of `ids` that are groups of `organization_id`.
    ///
    /// IDs belonging to another organization, or to no group at all, are
    /// left out.
    pub async fn groups_in_organization(
        &self,
        organization_id: &OrganizationId,
        ids: &[GroupId],
    ) -> Result<BTreeSet<GroupId>, DatabaseError> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let sql = format!(
            "SELECT id FROM groups WHERE organization_id = ?1 AND id IN ({})",
            placeholders(2, ids.len())
        );
        let mut rows = self
            .conn()
            .query(&sql, positional_ids(organization_id.as_str(), ids))
            .await?;
        let mut found = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            found.insert(GroupId::from(row.get::<String>(0)?));
        }
        Ok(found)
    }

    /// Ensure a group exists for every name and return `(name, id)` for each.
    ///
    /// Names that already exist (including ones created concurrently) resolve
    /// to the existing group instead of failing. New groups get source `oidc`.
    /// Duplicate names in the input are collapsed.
    pub async fn insert_missing_groups(
        &self,
        organization_id: &OrganizationId,
        names: &[String],
    ) -> Result<Vec<(String, GroupId)>, DatabaseError> {
        let mut names: Vec<&String> = names.iter().collect();
        names.sort();
        names.dedup();

        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let id = self.generate_id(PREFIX_GROUP).await?;
            let inserted = self
                .conn()
                .execute(
                    "INSERT INTO groups (id, organization_id, name, source, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT (organization_id, name) DO NOTHING",
                    libsql::params![
                        id.as_str(),
                        organization_id.as_str(),
                        name.as_str(),
                        GroupSource::Oidc.as_str(),
                        Utc::now().to_rfc3339()
                    ],
                )
                .await?;

            let group = self
                .get_group_by_name(organization_id, name)
                .await?
                .ok_or_else(|| {
                    DatabaseError::not_found("group", format!("'{name}' in {organization_id}"))
                })?;
            if inserted > 0 {
                tracing::info!(%organization_id, group_id = %group.id, name = %name, "created missing group");
            }
            resolved.push((name.clone(), group.id));
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use gs_core::enums::GroupSource;
    use std::collections::BTreeSet;

    use gs_core::ids::{GroupId, OrganizationId};
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::test_tx;

    #[tokio::test]
    async fn create_and_get_group() {
        let (_db, tx) = test_tx().await;
        let org = tx.create_organization("acme").await.unwrap();
        let group = tx.create_group(&org.id, "admins", GroupSource::User).await.unwrap();

        let fetched = tx.get_group(&group.id).await.unwrap();
        assert_eq!(fetched.name, "admins");
        assert_eq!(fetched.source, GroupSource::User);
        assert!(!fetched.is_everyone());
    }

    #[tokio::test]
    async fn same_name_allowed_in_different_organizations() {
        let (_db, tx) = test_tx().await;
        let a = tx.create_organization("a").await.unwrap();
        let b = tx.create_organization("b").await.unwrap();
        tx.create_group(&a.id, "eng", GroupSource::User).await.unwrap();
        tx.create_group(&b.id, "eng", GroupSource::User).await.unwrap();
        assert!(tx.create_group(&a.id, "eng", GroupSource::User).await.is_err());
    }

    #[tokio::test]
    async fn list_groups_includes_everyone() {
        let (_db, tx) = test_tx().await;
        let org = tx.create_organization("acme").await.unwrap();
        tx.create_group(&org.id, "admins", GroupSource::User).await.unwrap();

        let names: Vec<String> = tx
            .list_groups(&org.id)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Everyone".to_string(), "admins".to_string()]);
    }

    #[tokio::test]
    async fn groups_in_organization_drops_foreign_and_unknown_ids() {
        let (_db, tx) = test_tx().await;
        let a = tx.create_organization("a").await.unwrap();
        let b = tx.create_organization("b").await.unwrap();
        let ours = tx.create_group(&a.id, "eng", GroupSource::User).await.unwrap();
        let theirs = tx.create_group(&b.id, "eng", GroupSource::User).await.unwrap();

        let found = tx
            .groups_in_organization(
                &a.id,
                &[ours.id.clone(), theirs.id, GroupId::from("grp-deleted"), GroupId::everyone(&a.id)],
            )
            .await
            .unwrap();
        assert_eq!(found, BTreeSet::from([ours.id, GroupId::everyone(&a.id)]));
        assert!(tx.groups_in_organization(&a.id, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_missing_groups_creates_oidc_groups() {
        let (_db, tx) = test_tx().await;
        let org = tx.create_organization("acme").await.unwrap();

        let created = tx
            .insert_missing_groups(&org.id, &["newteam".to_string()])
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "newteam");

        let group = tx.get_group(&created[0].1).await.unwrap();
        assert_eq!(group.source, GroupSource::Oidc);
        assert_eq!(group.organization_id, org.id);
    }

    #[tokio::test]
    async fn insert_missing_groups_returns_existing_ids() {
        let (_db, tx) = test_tx().await;
        let org = tx.create_organization("acme").await.unwrap();
        let existing = tx.create_group(&org.id, "eng", GroupSource::User).await.unwrap();

        let resolved = tx
            .insert_missing_groups(&org.id, &["eng".to_string(), "eng".to_string()])
            .await
            .unwrap();
        assert_eq!(resolved, vec![("eng".to_string(), existing.id.clone())]);

        let again = tx
            .insert_missing_groups(&org.id, &["eng".to_string()])
            .await
            .unwrap();
        assert_eq!(again, resolved);
        assert_eq!(tx.get_group(&existing.id).await.unwrap().source, GroupSource::User);
    }

    #[tokio::test]
    async fn insert_missing_groups_into_unknown_org_fails() {
        let (_db, tx) = test_tx().await;
        let result = tx
            .insert_missing_groups(&OrganizationId::from("org-none"), &["x".to_string()])
            .await;
        assert!(result.is_err());
    }
}
