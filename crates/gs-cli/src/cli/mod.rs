use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `gsync` binary.
#[derive(Debug, Parser)]
#[command(
    name = "gsync",
    version,
    about = "Sync organization group memberships from identity provider claims"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store path, overriding `database.path` from config
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{GroupCommands, OrgCommands, SettingsCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["gsync", "--format", "raw", "--verbose", "init"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["gsync", "init", "--db", "/tmp/g.db", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.db.as_deref(), Some("/tmp/g.db"));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["gsync", "--format", "xml", "init"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn org_subcommands_parse() {
        let cli = Cli::try_parse_from(["gsync", "org", "add-member", "org-1", "user_1"])
            .expect("cli should parse");
        match cli.command {
            Commands::Org {
                action: OrgCommands::AddMember(args),
            } => {
                assert_eq!(args.organization_id, "org-1");
                assert_eq!(args.user_id, "user_1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn group_and_settings_subcommands_parse() {
        let cli = Cli::try_parse_from(["gsync", "group", "create", "org-1", "eng"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Group {
                action: GroupCommands::Create(_)
            }
        ));

        let cli = Cli::try_parse_from(["gsync", "settings", "set", "org-1", "settings.json"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Settings {
                action: SettingsCommands::Set(_)
            }
        ));
    }

    #[test]
    fn sync_requires_user_and_claims() {
        assert!(Cli::try_parse_from(["gsync", "sync", "user_1"]).is_err());

        let cli = Cli::try_parse_from(["gsync", "sync", "user_1", "claims.json"])
            .expect("cli should parse");
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.user_id, "user_1");
                assert_eq!(args.claims.to_str(), Some("claims.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["gsync", "--db", ":memory:", "init"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some(":memory:"));
        assert_eq!(flags.format, OutputFormat::Json);
    }
}
