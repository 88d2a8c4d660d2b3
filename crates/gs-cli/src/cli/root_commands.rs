use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{GroupCommands, OrgCommands, SettingsCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the store and run migrations.
    Init,
    /// Organizations.
    Org {
        #[command(subcommand)]
        action: OrgCommands,
    },
    /// Groups.
    Group {
        #[command(subcommand)]
        action: GroupCommands,
    },
    /// Per-organization group sync settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Sync a user's groups from a claims file.
    Sync(SyncArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// User to sync.
    pub user_id: String,
    /// JSON file holding the merged ID token and userinfo claims.
    pub claims: PathBuf,
}
