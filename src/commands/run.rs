//! # Setup Command Implementation
//!
//! The default command: set up a repository in single, batch or profile mode.
//!
//! ## Functionality
//!
//! - **Single**: clone (or update) `./<name>` and build it in place
//! - **Batch**: clone the entry plus a library list into `--batch-dir`, write
//!   an aggregate `CMakeLists.txt`, and build the whole tree
//! - **Profile**: batch mode with the library list from a saved profile
//! - **Interactive**: `-i` asks for anything not given on the command line

use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

use starlet_setup::cmake::{BuildType, CmakeBuilder};
use starlet_setup::config::{self, ConfigLocations};
use starlet_setup::defaults::DEFAULT_PROFILE;
use starlet_setup::interactive;
use starlet_setup::options::{Mode, RunRequest, SetupOptions};
use starlet_setup::orchestrator::{Orchestrator, Progress};
use starlet_setup::output::{self, emoji, OutputConfig};
use starlet_setup::process;
use starlet_setup::profiles::ProfileStore;
use starlet_setup::repository::{ExistingClone, RepositoryManager};
use starlet_setup::suggestions;

use super::prompt::DialoguerPrompter;
use crate::cli::Logging;

/// Tools every setup run needs.
const REQUIRED_TOOLS: [&str; 2] = ["git", "cmake"];

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Repository: owner/name or a full git URL
    #[arg(value_name = "REPO", required_unless_present = "interactive")]
    pub repo: Option<String>,

    /// Batch mode: clone library repositories alongside the entry repository
    #[arg(long, conflicts_with = "profile")]
    pub batch: bool,

    /// Library repositories for batch mode (bare names take the entry's owner)
    #[arg(long, value_name = "REPO", num_args = 1.., requires = "batch")]
    pub repos: Option<Vec<String>>,

    /// Use a saved profile as the library list ("default" if no name given)
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = DEFAULT_PROFILE)]
    pub profile: Option<String>,

    /// Use SSH instead of HTTPS for cloning
    #[arg(long)]
    pub ssh: bool,

    /// Show detailed command output
    #[arg(short, long)]
    pub verbose: bool,

    /// CMake build type
    #[arg(short = 'b', long, value_enum, ignore_case = true)]
    pub build_type: Option<BuildType>,

    /// Build directory name [default: build]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub build_dir: Option<String>,

    /// Directory for batch cloning [default: build-batch]
    #[arg(long, value_name = "DIR")]
    pub batch_dir: Option<String>,

    /// Skip building, only configure
    #[arg(short = 'n', long)]
    pub no_build: bool,

    /// Clean the build directory before configuring
    #[arg(short, long)]
    pub clean: bool,

    /// Additional CMake argument, repeatable (e.g. --cmake-arg=-DBUILD_TESTS=ON)
    #[arg(long, value_name = "ARG", allow_hyphen_values = true)]
    pub cmake_arg: Vec<String>,

    /// Update existing clones without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Ask for options interactively
    #[arg(short, long)]
    pub interactive: bool,
}

impl RunArgs {
    /// Flags that were given; unset flags are left for interactive mode or
    /// configured defaults.
    pub fn to_request(&self) -> RunRequest {
        let mode = if self.batch {
            Some(Mode::Batch {
                repos: self.repos.clone(),
            })
        } else {
            self.profile.clone().map(Mode::Profile)
        };

        RunRequest {
            repo: self.repo.clone(),
            mode,
            ssh: self.ssh.then_some(true),
            verbose: self.verbose.then_some(true),
            clean: self.clean.then_some(true),
            build_type: self.build_type,
            build_dir: self.build_dir.clone(),
            batch_dir: self.batch_dir.clone(),
            cmake_args: (!self.cmake_arg.is_empty()).then(|| self.cmake_arg.clone()),
            no_build: self.no_build.then_some(true),
            assume_yes: self.yes,
        }
    }
}

/// Execute the setup command.
pub fn execute(args: RunArgs, out: &OutputConfig, logging: Logging) -> Result<()> {
    let locations = ConfigLocations::discover();
    let loaded = config::load(&locations);
    for warning in &loaded.warnings {
        eprintln!("{}", output::warning(out, &format!("{}; using defaults", warning)));
    }

    let mut request = args.to_request();
    if args.interactive {
        println!("Starlet Setup Interactive Mode");
        request = interactive::fill_interactively(
            request,
            &loaded.config.defaults,
            &mut DialoguerPrompter::new(),
        )?;
        println!();
    }
    let options = SetupOptions::resolve(request, &loaded.config.defaults).map_err(suggestions::explain)?;
    logging.follow_verbose(options.verbose);

    process::check_prerequisites(&REQUIRED_TOOLS).map_err(suggestions::explain)?;

    let profile_path = loaded.path.clone().unwrap_or_else(|| locations.write_target());
    let profiles = ProfileStore::from_config(loaded.config.clone(), profile_path);

    let manager = RepositoryManager::new(options.verbose);
    let builder = CmakeBuilder::new(options.verbose);
    let orchestrator = Orchestrator::new(&manager, &builder, std::env::current_dir()?);

    println!(
        "{} Setting up {} ({})",
        emoji(out, "🚀", "[SETUP]"),
        options.repo,
        describe_mode(&options.mode)
    );

    let existing = if options.mode == Mode::Single {
        existing_clone_policy(
            &orchestrator
                .single_target_dir(&options)
                .map_err(suggestions::explain)?,
            options.assume_yes,
        )?
    } else {
        ExistingClone::Update
    };

    let mut report_progress = |progress: &Progress| match progress {
        Progress::MemberSkipped { .. } => eprintln!("{}", output::progress_line(out, progress)),
        _ => println!("{}", output::progress_line(out, progress)),
    };
    let report = orchestrator
        .run(
            &options,
            existing,
            &profiles,
            loaded.config.default_repos(),
            &mut report_progress,
        )
        .map_err(suggestions::explain)?;

    let action = if options.build.no_build { "Configured" } else { "Built" };
    println!(
        "{}",
        output::success(
            out,
            &format!(
                "{} {} ({}) in {}",
                action,
                target_label(&options),
                options.build.build_type,
                report.build_dir.display()
            )
        )
    );
    if !report.skipped.is_empty() {
        eprintln!(
            "{}",
            output::warning(
                out,
                &format!("Skipped without CMakeLists.txt: {}", report.skipped.join(", "))
            )
        );
    }

    Ok(())
}

fn describe_mode(mode: &Mode) -> String {
    match mode {
        Mode::Single => "single repository".to_string(),
        Mode::Batch { repos: Some(repos) } => format!("batch, {} listed", repos.len()),
        Mode::Batch { repos: None } => "batch, default libraries".to_string(),
        Mode::Profile(name) => format!("profile '{}'", name),
    }
}

fn target_label(options: &SetupOptions) -> String {
    match options.mode {
        Mode::Single => starlet_setup::reference::short_name(&options.repo),
        _ => options.batch_dir.display().to_string(),
    }
}

/// Decide what to do when the single-mode clone directory already exists.
///
/// Asks on a terminal; `--yes` or a non-interactive stdin means update.
fn existing_clone_policy(target: &Path, assume_yes: bool) -> Result<ExistingClone> {
    if !target.exists() || assume_yes || !std::io::stdin().is_terminal() {
        return Ok(ExistingClone::Update);
    }

    let update = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "{} already exists. Update it with git pull?",
            target.display()
        ))
        .default(true)
        .interact()?;

    Ok(if update {
        ExistingClone::Update
    } else {
        ExistingClone::Keep
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(argv: &[&str]) -> RunArgs {
        let mut full = vec!["starlet-setup"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().run
    }

    #[test]
    fn test_unset_flags_stay_unset() {
        let request = parse(&["a/app"]).to_request();
        assert_eq!(request.repo.as_deref(), Some("a/app"));
        assert_eq!(request.mode, None);
        assert_eq!(request.ssh, None);
        assert_eq!(request.no_build, None);
        assert_eq!(request.cmake_args, None);
    }

    #[test]
    fn test_batch_with_repos() {
        let request = parse(&["a/app", "--batch", "--repos", "lib1", "b/lib2"]).to_request();
        assert_eq!(
            request.mode,
            Some(Mode::Batch {
                repos: Some(vec!["lib1".to_string(), "b/lib2".to_string()])
            })
        );
    }

    #[test]
    fn test_profile_defaults_to_default() {
        assert_eq!(
            parse(&["a/app", "--profile"]).to_request().mode,
            Some(Mode::Profile("default".to_string()))
        );
        assert_eq!(
            parse(&["a/app", "--profile", "gfx"]).to_request().mode,
            Some(Mode::Profile("gfx".to_string()))
        );
    }

    #[test]
    fn test_build_flags() {
        let request = parse(&[
            "a/app",
            "-b",
            "relwithdebinfo",
            "-d",
            "out",
            "-n",
            "--ssh",
            "--cmake-arg=-DBUILD_TESTS=ON",
            "--cmake-arg",
            "-GNinja",
        ])
        .to_request();

        assert_eq!(request.build_type, Some(BuildType::RelWithDebInfo));
        assert_eq!(request.build_dir.as_deref(), Some("out"));
        assert_eq!(request.no_build, Some(true));
        assert_eq!(request.ssh, Some(true));
        assert_eq!(
            request.cmake_args,
            Some(vec!["-DBUILD_TESTS=ON".to_string(), "-GNinja".to_string()])
        );
    }

    #[test]
    fn test_existing_clone_policy_without_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(
            existing_clone_policy(&temp.path().join("absent"), false).unwrap(),
            ExistingClone::Update
        );
        assert_eq!(
            existing_clone_policy(temp.path(), true).unwrap(),
            ExistingClone::Update
        );
    }
}
