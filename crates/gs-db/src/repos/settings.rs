//! Stored per-organization group sync settings.

use chrono::Utc;

use gs_core::ids::OrganizationId;
use gs_core::settings::GroupSyncSettings;

use crate::GsTx;
use crate::error::DatabaseError;

impl GsTx {
    /// Store settings for an organization, replacing any previous value.
    pub async fn upsert_sync_settings(
        &self,
        organization_id: &OrganizationId,
        settings: &GroupSyncSettings,
    ) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(settings)?;
        self.conn()
            .execute(
                "INSERT INTO group_sync_settings (organization_id, settings, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (organization_id) DO UPDATE
                 SET settings = excluded.settings, updated_at = excluded.updated_at",
                libsql::params![organization_id.as_str(), json, Utc::now().to_rfc3339()],
            )
            .await?;
        tracing::debug!(%organization_id, field = %settings.field, "group sync settings stored");
        Ok(())
    }

    /// Settings stored for an organization, or `None` if never configured.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::CorruptRow` if the stored JSON is malformed.
    pub async fn get_sync_settings(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<GroupSyncSettings>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT settings FROM group_sync_settings WHERE organization_id = ?1",
                [organization_id.as_str()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let raw = row.get::<String>(0)?;
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            DatabaseError::CorruptRow(format!(
                "group sync settings for organization {organization_id}: {e}"
            ))
        })
    }
}
