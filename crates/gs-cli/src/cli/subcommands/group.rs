use clap::{Args, Subcommand};

/// Group commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GroupCommands {
    /// Create a manually managed group.
    Create(GroupCreateArgs),
    /// List an organization's groups.
    List(GroupListArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GroupCreateArgs {
    pub organization_id: String,
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct GroupListArgs {
    pub organization_id: String,
}
