use anyhow::Context;
use gs_config::GsConfig;
use gs_core::ids::OrganizationId;
use gs_core::settings::GroupSyncSettings;
use serde_json::json;

use crate::bootstrap::open_store;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::{SettingsCommands, SettingsGetArgs, SettingsSetArgs};
use crate::output::output;

/// Handle `gsync settings`.
pub async fn handle(
    action: &SettingsCommands,
    config: &GsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SettingsCommands::Set(args) => set(args, config, flags).await,
        SettingsCommands::Get(args) => get(args, config, flags).await,
    }
}

async fn set(args: &SettingsSetArgs, config: &GsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let organization_id = OrganizationId::parse(args.organization_id.as_str())?;
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read settings file '{}'", args.file.display()))?;
    let settings: GroupSyncSettings = serde_json::from_str(&raw)
        .with_context(|| format!("invalid settings in '{}'", args.file.display()))?;

    let db = open_store(config).await?;
    let tx = db.begin().await?;
    tx.get_organization(&organization_id)
        .await
        .with_context(|| format!("organization '{organization_id}' not found"))?;
    tx.upsert_sync_settings(&organization_id, &settings).await?;
    tx.commit().await?;

    if !settings.is_enabled() {
        tracing::warn!(%organization_id, "settings stored with an empty field, group sync is off for this organization");
    }
    output(
        &json!({
            "organization_id": organization_id,
            "settings": settings,
        }),
        flags.format,
    )
}

async fn get(args: &SettingsGetArgs, config: &GsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let organization_id = OrganizationId::parse(args.organization_id.as_str())?;

    let db = open_store(config).await?;
    let tx = db.begin().await?;
    let settings = tx.get_sync_settings(&organization_id).await?;
    tx.rollback().await?;

    output(
        &json!({
            "organization_id": organization_id,
            "settings": settings,
        }),
        flags.format,
    )
}
