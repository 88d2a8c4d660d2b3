use clap::{Args, Subcommand};

/// Organization commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OrgCommands {
    /// Create an organization and its everyone group.
    Create(OrgCreateArgs),
    /// Add a user to an organization.
    AddMember(OrgAddMemberArgs),
}

#[derive(Clone, Debug, Args)]
pub struct OrgCreateArgs {
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct OrgAddMemberArgs {
    pub organization_id: String,
    pub user_id: String,
}
