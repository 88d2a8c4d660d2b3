use anyhow::Context;
use gs_config::GsConfig;
use gs_db::GsDb;

use crate::cli::GlobalFlags;

/// Load layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<GsConfig> {
    let mut config = GsConfig::load_with_dotenv().context("failed to load gsync configuration")?;
    if let Some(path) = &flags.db {
        config.database.path.clone_from(path);
    }
    config.validate()?;
    Ok(config)
}

/// Open the membership store named by `config`, running migrations.
pub async fn open_store(config: &GsConfig) -> anyhow::Result<GsDb> {
    GsDb::open(&config.database)
        .await
        .with_context(|| format!("failed to open store at '{}'", config.database.path))
}
