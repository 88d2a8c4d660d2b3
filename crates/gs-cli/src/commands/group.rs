use anyhow::Context;
use gs_config::GsConfig;
use gs_core::enums::GroupSource;
use gs_core::ids::OrganizationId;

use crate::bootstrap::open_store;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::{GroupCommands, GroupCreateArgs, GroupListArgs};
use crate::output::output;

/// Handle `gsync group`.
pub async fn handle(
    action: &GroupCommands,
    config: &GsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GroupCommands::Create(args) => create(args, config, flags).await,
        GroupCommands::List(args) => list(args, config, flags).await,
    }
}

async fn create(
    args: &GroupCreateArgs,
    config: &GsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let organization_id = OrganizationId::parse(args.organization_id.as_str())?;

    let db = open_store(config).await?;
    let tx = db.begin().await?;
    let group = tx
        .create_group(&organization_id, &args.name, GroupSource::User)
        .await
        .with_context(|| {
            format!(
                "failed to create group '{}' in organization '{organization_id}'",
                args.name
            )
        })?;
    tx.commit().await?;
    output(&group, flags.format)
}

async fn list(args: &GroupListArgs, config: &GsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let organization_id = OrganizationId::parse(args.organization_id.as_str())?;

    let db = open_store(config).await?;
    let tx = db.begin().await?;
    let groups = tx.list_groups(&organization_id).await?;
    tx.rollback().await?;
    output(&groups, flags.format)
}
