use anyhow::Context;
use gs_config::GsConfig;
use gs_core::ids::{OrganizationId, UserId};
use serde_json::json;

use crate::bootstrap::open_store;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::{OrgAddMemberArgs, OrgCommands, OrgCreateArgs};
use crate::output::output;

/// Handle `gsync org`.
pub async fn handle(
    action: &OrgCommands,
    config: &GsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OrgCommands::Create(args) => create(args, config, flags).await,
        OrgCommands::AddMember(args) => add_member(args, config, flags).await,
    }
}

async fn create(args: &OrgCreateArgs, config: &GsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = open_store(config).await?;
    let tx = db.begin().await?;
    let organization = tx
        .create_organization(&args.name)
        .await
        .with_context(|| format!("failed to create organization '{}'", args.name))?;
    tx.commit().await?;
    output(&organization, flags.format)
}

async fn add_member(
    args: &OrgAddMemberArgs,
    config: &GsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let organization_id = OrganizationId::parse(args.organization_id.as_str())?;
    let user_id = UserId::parse(args.user_id.as_str())?;

    let db = open_store(config).await?;
    let tx = db.begin().await?;
    tx.get_organization(&organization_id)
        .await
        .with_context(|| format!("organization '{organization_id}' not found"))?;
    tx.add_organization_member(&organization_id, &user_id).await?;
    tx.commit().await?;

    output(
        &json!({
            "organization_id": organization_id,
            "user_id": user_id,
        }),
        flags.format,
    )
}
