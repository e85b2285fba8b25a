//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use starlet_setup::output::OutputConfig;

use crate::commands;

const AFTER_HELP: &str = "\
Examples:
  Single repository:
    starlet-setup username/repo
    starlet-setup git@github.com:username/repo.git --ssh
    starlet-setup username/repo --build-dir out --build-type Release

  Batch:
    starlet-setup username/app --batch --repos username/lib1 lib2
    starlet-setup username/app --batch --batch-dir my_workspace

  Profile:
    starlet-setup username/app --profile
    starlet-setup username/app --profile graphics

  Profiles and config:
    starlet-setup profile list
    starlet-setup profile add graphics username/lib1 username/lib2
    starlet-setup profile remove graphics
    starlet-setup init-config";

/// Starlet Setup - Clone and build CMake projects, alone or as one aggregated tree
#[derive(Parser, Debug)]
#[command(name = "starlet-setup")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    /// Subcommand to execute; without one, sets up a repository
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: commands::run::RunArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace) [default: warn, or debug with --verbose]
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage saved repository profiles
    Profile(commands::profile::ProfileArgs),

    /// Write a starter .starlet-setup.json in the current directory
    InitConfig(commands::init_config::InitConfigArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let logging = init_logging(self.log_level.as_deref(), self.run.verbose);

        let out = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Some(Commands::Profile(args)) => commands::profile::execute(args, &out),
            Some(Commands::InitConfig(args)) => commands::init_config::execute(args, &out),
            Some(Commands::Completions(args)) => commands::completions::execute(args),
            None => commands::run::execute(self.run, &out, logging),
        }
    }
}

/// Handle on the installed logger.
///
/// A level set with `--log-level` or `RUST_LOG` is pinned. Otherwise it starts
/// at warn (debug with `-v`) and follows verbosity from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logging {
    pinned: bool,
}

impl Logging {
    /// Raise the level to debug when `verbose`, unless it is pinned.
    pub fn follow_verbose(self, verbose: bool) {
        if let Some(level) = self.level_for(verbose) {
            log::set_max_level(level);
        }
    }

    fn level_for(self, verbose: bool) -> Option<LevelFilter> {
        (!self.pinned && verbose).then_some(LevelFilter::Debug)
    }
}

/// Filter string for the logger and whether it is pinned.
fn logger_filter(log_level: Option<&str>, rust_log_set: bool) -> (Option<String>, bool) {
    if rust_log_set {
        return (None, true);
    }
    match log_level {
        Some(level) => (Some(level.to_string()), true),
        // Filter wide open; the max level below does the gating
        None => (Some("debug".to_string()), false),
    }
}

/// `RUST_LOG` wins when set; otherwise the level from the flags applies.
fn init_logging(log_level: Option<&str>, verbose: bool) -> Logging {
    let (filter, pinned) = logger_filter(log_level, std::env::var_os("RUST_LOG").is_some());
    let mut builder = match filter {
        Some(filter) => {
            let mut builder = env_logger::Builder::new();
            builder.parse_filters(&filter);
            builder
        }
        None => env_logger::Builder::from_default_env(),
    };
    builder.format_timestamp(None).format_target(false);
    // A logger can only be installed once per process
    let _ = builder.try_init();

    if !pinned {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }
    Logging { pinned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_logger_filter_precedence() {
        assert_eq!(logger_filter(None, false), (Some("debug".to_string()), false));
        assert_eq!(logger_filter(Some("info"), false), (Some("info".to_string()), true));
        assert_eq!(logger_filter(Some("info"), true), (None, true));
    }

    #[test]
    fn test_configured_verbosity_raises_unpinned_level() {
        let unpinned = Logging { pinned: false };
        assert_eq!(unpinned.level_for(true), Some(LevelFilter::Debug));
        assert_eq!(unpinned.level_for(false), None);
        assert_eq!(Logging { pinned: true }.level_for(true), None);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_mode_parse() {
        let cli = Cli::try_parse_from(["starlet-setup", "masonlet/starlet-samples", "-b", "release"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.repo.as_deref(), Some("masonlet/starlet-samples"));
        assert_eq!(cli.color, "auto");
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_subcommand_parse() {
        let cli = Cli::try_parse_from(["starlet-setup", "profile", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Profile(_))));

        let cli = Cli::try_parse_from(["starlet-setup", "init-config", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::InitConfig(_))));
    }

    #[test]
    fn test_repo_required_without_interactive() {
        let err = Cli::try_parse_from(["starlet-setup"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        Cli::try_parse_from(["starlet-setup", "-i"]).unwrap();
    }

    #[test]
    fn test_batch_and_profile_conflict() {
        let err = Cli::try_parse_from(["starlet-setup", "a/b", "--batch", "--profile"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_repos_requires_batch() {
        let err = Cli::try_parse_from(["starlet-setup", "a/b", "--repos", "x/y"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
