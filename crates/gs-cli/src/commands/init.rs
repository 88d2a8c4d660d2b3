use gs_config::GsConfig;
use serde_json::json;

use crate::bootstrap::open_store;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `gsync init`.
pub async fn handle(config: &GsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    open_store(config).await?;
    tracing::debug!(path = %config.database.path, "store initialized");
    output(
        &json!({
            "database": config.database.path,
            "sync_enabled": config.sync.enabled,
        }),
        flags.format,
    )
}
