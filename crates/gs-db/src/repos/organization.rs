//! Organization repository. Creating an organization also creates its
//! everyone group.

use chrono::Utc;

use gs_core::entities::{EVERYONE_GROUP_NAME, Organization};
use gs_core::enums::GroupSource;
use gs_core::ids::{GroupId, OrganizationId, PREFIX_ORGANIZATION, UserId};

use crate::GsTx;
use crate::error::DatabaseError;
use crate::helpers::parse_datetime;

fn row_to_organization(row: &libsql::Row) -> Result<Organization, DatabaseError> {
    Ok(Organization {
        id: OrganizationId::from(row.get::<String>(0)?),
        name: row.get::<String>(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl GsTx {
    pub async fn create_organization(&self, name: &str) -> Result<Organization, DatabaseError> {
        let now = Utc::now();
        let id = OrganizationId::from(self.generate_id(PREFIX_ORGANIZATION).await?);

        self.conn()
            .execute(
                "INSERT INTO organizations (id, name, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![id.as_str(), name, now.to_rfc3339()],
            )
            .await?;

        self.conn()
            .execute(
                "INSERT INTO groups (id, organization_id, name, source, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    GroupId::everyone(&id).as_str(),
                    id.as_str(),
                    EVERYONE_GROUP_NAME,
                    GroupSource::Everyone.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(organization_id = %id, name, "organization created");
        Ok(Organization {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    pub async fn get_organization(&self, id: &OrganizationId) -> Result<Organization, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, name, created_at FROM organizations WHERE id = ?1",
                [id.as_str()],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("organization", id))?;
        row_to_organization(&row)
    }

    /// Make `user_id` a member of the organization by adding them to its
    /// everyone group. Adding an existing member is a no-op.
    pub async fn add_organization_member(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<(), DatabaseError> {
        let everyone = GroupId::everyone(organization_id);
        let changed = self
            .conn()
            .execute(
                "INSERT OR IGNORE INTO group_members (user_id, group_id, created_at)
                 VALUES (?1, ?2, ?3)",
                libsql::params![user_id.as_str(), everyone.as_str(), Utc::now().to_rfc3339()],
            )
            .await?;
        tracing::debug!(%organization_id, %user_id, changed, "organization member added");
        Ok(())
    }
}
