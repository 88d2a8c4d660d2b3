use gs_config::GsConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &GsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Init => commands::init::handle(config, flags).await,
        Commands::Org { action } => commands::org::handle(&action, config, flags).await,
        Commands::Group { action } => commands::group::handle(&action, config, flags).await,
        Commands::Settings { action } => commands::settings::handle(&action, config, flags).await,
        Commands::Sync(args) => commands::sync::handle(&args, config, flags).await,
    }
}
