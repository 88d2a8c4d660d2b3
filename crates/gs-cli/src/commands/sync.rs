use anyhow::{Context, bail};
use gs_config::GsConfig;
use gs_core::ids::UserId;
use gs_db::retry::RetryConfig;
use gs_idpsync::{GroupSync, StoredPolicyResolver};
use serde_json::Value;

use crate::bootstrap::open_store;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SyncArgs;
use crate::output::output;

/// Handle `gsync sync`.
pub async fn handle(args: &SyncArgs, config: &GsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user_id = UserId::parse(args.user_id.as_str())?;
    let raw = tokio::fs::read_to_string(&args.claims)
        .await
        .with_context(|| format!("failed to read claims file '{}'", args.claims.display()))?;
    let claims = match serde_json::from_str::<Value>(&raw)
        .with_context(|| format!("invalid JSON in '{}'", args.claims.display()))?
    {
        Value::Object(map) => map,
        other => bail!(
            "claims in '{}' must be a JSON object, got {}",
            args.claims.display(),
            gs_idpsync::claims::json_type_name(&other)
        ),
    };

    let db = open_store(config).await?;
    let sync = GroupSync::from_config(StoredPolicyResolver, &config.sync);
    let params = sync.parse_group_claims(claims);
    let retry = RetryConfig::from_config(&config.sync);

    let report = sync
        .sync_groups_with_retry(&db, &user_id, &params, &retry)
        .await
        .with_context(|| format!("group sync failed for user '{user_id}'"))?;
    output(&report, flags.format)
}
