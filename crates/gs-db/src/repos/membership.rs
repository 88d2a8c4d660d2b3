//! Group membership repository.

use chrono::Utc;

use gs_core::identity::ExistingGroup;
use gs_core::ids::{GroupId, OrganizationId, UserId};

use crate::GsTx;
use crate::error::DatabaseError;
use crate::helpers::{placeholders, positional_ids};

impl GsTx {
    /// All groups `user_id` belongs to, across every organization.
    ///
    /// A user belongs to an organization exactly when they are in one of its
    /// groups (normally at least its everyone group).
    pub async fn get_user_groups(&self, user_id: &UserId) -> Result<Vec<ExistingGroup>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT g.id, g.name, g.organization_id, g.id = g.organization_id
                 FROM group_members m
                 JOIN groups g ON g.id = m.group_id
                 WHERE m.user_id = ?1
                 ORDER BY g.organization_id, g.name",
                [user_id.as_str()],
            )
            .await?;

        let mut groups = Vec::new();
        while let Some(row) = rows.next().await? {
            groups.push(ExistingGroup {
                id: GroupId::from(row.get::<String>(0)?),
                name: row.get::<String>(1)?,
                organization_id: OrganizationId::from(row.get::<String>(2)?),
                is_everyone: row.get::<i64>(3)? != 0,
            });
        }
        Ok(groups)
    }

    /// Add `user_id` to every group in `add` and remove them from every group
    /// in `remove`. Existing memberships and absent removals are ignored, and
    /// so are group IDs that do not exist.
    pub async fn set_user_groups(
        &self,
        user_id: &UserId,
        add: &[GroupId],
        remove: &[GroupId],
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        for group_id in add {
            let inserted = self
                .conn()
                .execute(
                    "INSERT OR IGNORE INTO group_members (user_id, group_id, created_at)
                     SELECT ?1, id, ?3 FROM groups WHERE id = ?2",
                    libsql::params![user_id.as_str(), group_id.as_str(), now.as_str()],
                )
                .await?;
            if inserted == 0 {
                tracing::debug!(%user_id, %group_id, "membership not added, group missing or already joined");
            }
        }
        if !remove.is_empty() {
            let sql = format!(
                "DELETE FROM group_members WHERE user_id = ?1 AND group_id IN ({})",
                placeholders(2, remove.len())
            );
            self.conn()
                .execute(&sql, positional_ids(user_id.as_str(), remove))
                .await?;
        }
        tracing::debug!(%user_id, added = add.len(), removed = remove.len(), "user groups updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gs_core::enums::GroupSource;
    use gs_core::ids::{GroupId, UserId};
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::test_tx;

    #[tokio::test]
    async fn user_without_memberships_has_no_groups() {
        let (_db, tx) = test_tx().await;
        let groups = tx.get_user_groups(&UserId::from("nobody")).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn get_user_groups_spans_organizations() {
        let (_db, tx) = test_tx().await;
        let user = UserId::from("user_1");
        let a = tx.create_organization("a").await.unwrap();
        let b = tx.create_organization("b").await.unwrap();
        tx.add_organization_member(&a.id, &user).await.unwrap();
        tx.add_organization_member(&b.id, &user).await.unwrap();
        let eng = tx.create_group(&b.id, "eng", GroupSource::User).await.unwrap();
        tx.set_user_groups(&user, &[eng.id.clone()], &[]).await.unwrap();

        let groups = tx.get_user_groups(&user).await.unwrap();
        assert_eq!(groups.len(), 3);

        let in_b: Vec<_> = groups.iter().filter(|g| g.organization_id == b.id).collect();
        assert_eq!(in_b.len(), 2);
        assert!(in_b.iter().any(|g| g.id == eng.id && !g.is_everyone && g.name == "eng"));
        assert!(in_b.iter().any(|g| g.id == GroupId::everyone(&b.id) && g.is_everyone));
    }

    #[tokio::test]
    async fn set_user_groups_adds_and_removes() {
        let (_db, tx) = test_tx().await;
        let user = UserId::from("user_1");
        let org = tx.create_organization("acme").await.unwrap();
        tx.add_organization_member(&org.id, &user).await.unwrap();
        let eng = tx.create_group(&org.id, "eng", GroupSource::User).await.unwrap();
        let ops = tx.create_group(&org.id, "ops", GroupSource::User).await.unwrap();

        tx.set_user_groups(&user, &[eng.id.clone(), ops.id.clone()], &[]).await.unwrap();
        tx.set_user_groups(&user, &[eng.id.clone()], &[ops.id.clone()]).await.unwrap();

        let mut names: Vec<String> = tx
            .get_user_groups(&user)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Everyone".to_string(), "eng".to_string()]);
    }

    #[tokio::test]
    async fn removal_only_touches_the_given_user() {
        let (_db, tx) = test_tx().await;
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        let org = tx.create_organization("acme").await.unwrap();
        let eng = tx.create_group(&org.id, "eng", GroupSource::User).await.unwrap();
        let ops = tx.create_group(&org.id, "ops", GroupSource::User).await.unwrap();
        let both = [eng.id.clone(), ops.id.clone()];
        tx.set_user_groups(&alice, &both, &[]).await.unwrap();
        tx.set_user_groups(&bob, &both, &[]).await.unwrap();

        tx.set_user_groups(&alice, &[], &both).await.unwrap();

        assert!(tx.get_user_groups(&alice).await.unwrap().is_empty());
        assert_eq!(tx.get_user_groups(&bob).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn removing_absent_membership_is_noop() {
        let (_db, tx) = test_tx().await;
        let org = tx.create_organization("acme").await.unwrap();
        let eng = tx.create_group(&org.id, "eng", GroupSource::User).await.unwrap();
        tx.set_user_groups(&UserId::from("u"), &[], &[eng.id]).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_group_is_skipped_and_others_still_added() {
        let (_db, tx) = test_tx().await;
        let user = UserId::from("u");
        let org = tx.create_organization("acme").await.unwrap();
        let eng = tx.create_group(&org.id, "eng", GroupSource::User).await.unwrap();

        tx.set_user_groups(&user, &[GroupId::from("grp-deleted"), eng.id.clone()], &[])
            .await
            .unwrap();

        let ids: Vec<GroupId> = tx
            .get_user_groups(&user)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![eng.id]);
    }
}
