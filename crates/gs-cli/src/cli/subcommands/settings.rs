use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Group sync settings commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SettingsCommands {
    /// Store settings from a JSON file, replacing any previous value.
    Set(SettingsSetArgs),
    /// Print the stored settings.
    Get(SettingsGetArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SettingsSetArgs {
    pub organization_id: String,
    /// JSON file with `field`, `mapping`, `regex_filter`, `auto_create_missing_groups`.
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SettingsGetArgs {
    pub organization_id: String,
}
