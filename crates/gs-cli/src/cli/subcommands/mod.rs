mod group;
mod org;
mod settings;

pub use group::{GroupCommands, GroupCreateArgs, GroupListArgs};
pub use org::{OrgAddMemberArgs, OrgCommands, OrgCreateArgs};
pub use settings::{SettingsCommands, SettingsGetArgs, SettingsSetArgs};
