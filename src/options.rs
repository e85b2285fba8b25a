//! Run options and their resolution.
//!
//! A [`RunRequest`] is what the user asked for: every field is optional and
//! `None` means "not specified". [`SetupOptions::resolve`] layers it over the
//! configuration's `defaults.*` section and the built-in defaults, in that
//! order, and validates the entry repository.

use std::path::PathBuf;

use crate::cmake::{BuildSettings, BuildType};
use crate::config::Defaults;
use crate::defaults::{DEFAULT_BATCH_DIR, DEFAULT_BUILD_DIR};
use crate::error::{Error, Result};
use crate::planner::MemberSource;
use crate::reference::{self, Protocol};

/// How the entry repository is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Clone and build one repository on its own.
    Single,
    /// Clone the entry with a list of libraries into a batch directory.
    /// `None` uses the configured or built-in default list.
    Batch { repos: Option<Vec<String>> },
    /// Like `Batch`, with the library list taken from a saved profile.
    Profile(String),
}

impl Mode {
    /// Member source for the planner; `None` in single mode.
    pub fn member_source(&self) -> Option<MemberSource> {
        match self {
            Mode::Single => None,
            Mode::Batch { repos: Some(repos) } => Some(MemberSource::Explicit(repos.clone())),
            Mode::Batch { repos: None } => Some(MemberSource::Defaults),
            Mode::Profile(name) => Some(MemberSource::Profile(name.clone())),
        }
    }
}

/// User-supplied options before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub repo: Option<String>,
    pub mode: Option<Mode>,
    pub ssh: Option<bool>,
    pub verbose: Option<bool>,
    pub clean: Option<bool>,
    pub build_type: Option<BuildType>,
    pub build_dir: Option<String>,
    pub batch_dir: Option<String>,
    pub cmake_args: Option<Vec<String>>,
    pub no_build: Option<bool>,
    /// Update existing clones without asking.
    pub assume_yes: bool,
}

/// Fully resolved options for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    /// Entry repository identifier, as given.
    pub repo: String,
    pub mode: Mode,
    pub protocol: Protocol,
    pub verbose: bool,
    pub build: BuildSettings,
    pub batch_dir: PathBuf,
    pub assume_yes: bool,
}

impl SetupOptions {
    /// Apply `defaults` beneath `request`.
    ///
    /// The entry must be URL-shaped or `owner/name`; the owner is needed to
    /// qualify bare library names in batch mode.
    pub fn resolve(request: RunRequest, defaults: &Defaults) -> Result<Self> {
        let repo = request
            .repo
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::InvalidIdentifier {
                identifier: String::new(),
                reason: "a repository is required".to_string(),
            })?;
        reference::normalize(&repo, Protocol::Https)?;

        let protocol = Protocol::from_prefer_ssh(request.ssh.or(defaults.ssh).unwrap_or(false));
        let build = BuildSettings {
            build_type: request
                .build_type
                .or(defaults.build_type)
                .unwrap_or_default(),
            build_dir: request
                .build_dir
                .or_else(|| defaults.build_dir.clone())
                .unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string()),
            cmake_args: request
                .cmake_args
                .or_else(|| defaults.cmake_arg.clone())
                .unwrap_or_default(),
            no_build: request.no_build.or(defaults.no_build).unwrap_or(false),
            clean: request.clean.unwrap_or(false),
        };
        let batch_dir = request
            .batch_dir
            .or_else(|| defaults.batch_dir.clone())
            .unwrap_or_else(|| DEFAULT_BATCH_DIR.to_string());

        Ok(Self {
            repo,
            mode: request.mode.unwrap_or(Mode::Single),
            protocol,
            verbose: request.verbose.or(defaults.verbose).unwrap_or(false),
            build,
            batch_dir: PathBuf::from(batch_dir),
            assume_yes: request.assume_yes,
        })
    }
}
