//! # CMake Configure and Build
//!
//! Drives the configure/build cycle for a source tree, which is either a
//! single cloned repository or a batch directory holding the generated
//! aggregate `CMakeLists.txt`.
//!
//! The cycle is:
//! 1. Optionally remove the build directory (`--clean`).
//! 2. Create the build directory.
//! 3. `cmake -S <source> -B <build> -DCMAKE_BUILD_TYPE=<type> [extra args...]`
//! 4. Unless configure-only: `cmake --build <build> --config <type>`
//!
//! Command execution goes through the [`BuildOperations`] trait so the
//! orchestrator can be tested without cmake installed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::DEFAULT_BUILD_DIR;
use crate::error::Result;
use crate::process::{self, CommandSpec};

/// CMake build configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum BuildType {
    #[default]
    #[value(name = "Debug")]
    Debug,
    #[value(name = "Release")]
    Release,
    #[value(name = "RelWithDebInfo")]
    RelWithDebInfo,
    #[value(name = "MinSizeRel")]
    MinSizeRel,
}

impl BuildType {
    pub const ALL: [BuildType; 4] = [
        BuildType::Debug,
        BuildType::Release,
        BuildType::RelWithDebInfo,
        BuildType::MinSizeRel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BuildType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown build type '{}'. Use: Debug, Release, RelWithDebInfo, or MinSizeRel",
                    s
                )
            })
    }
}

/// Everything the build step needs besides the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub build_type: BuildType,
    /// Build directory name, relative to the source directory.
    pub build_dir: String,
    /// Extra arguments appended to the configure command.
    pub cmake_args: Vec<String>,
    /// Configure only, skip the build step.
    pub no_build: bool,
    /// Remove the build directory before configuring.
    pub clean: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            build_type: BuildType::Debug,
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            cmake_args: Vec::new(),
            no_build: false,
            clean: false,
        }
    }
}

/// Command line for the configure step.
pub fn configure_command(source_dir: &Path, build_dir: &Path, settings: &BuildSettings) -> CommandSpec {
    CommandSpec::new("cmake")
        .arg("-S")
        .path_arg(source_dir)
        .arg("-B")
        .path_arg(build_dir)
        .arg(format!("-DCMAKE_BUILD_TYPE={}", settings.build_type))
        .args(settings.cmake_args.iter().cloned())
}

/// Command line for the build step.
pub fn build_command(build_dir: &Path, settings: &BuildSettings) -> CommandSpec {
    CommandSpec::new("cmake")
        .arg("--build")
        .path_arg(build_dir)
        .args(["--config", settings.build_type.as_str()])
}

/// Trait for the configure/build steps - allows mocking in tests
pub trait BuildOperations: Send + Sync {
    fn configure(&self, source_dir: &Path, build_dir: &Path, settings: &BuildSettings) -> Result<()>;

    fn build(&self, build_dir: &Path, settings: &BuildSettings) -> Result<()>;
}

/// The default implementation of `BuildOperations`, which runs `cmake`.
pub struct CmakeBuilder {
    verbose: bool,
}

impl CmakeBuilder {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl BuildOperations for CmakeBuilder {
    fn configure(&self, source_dir: &Path, build_dir: &Path, settings: &BuildSettings) -> Result<()> {
        process::run(&configure_command(source_dir, build_dir, settings), self.verbose)
    }

    fn build(&self, build_dir: &Path, settings: &BuildSettings) -> Result<()> {
        process::run(&build_command(build_dir, settings), self.verbose)
    }
}

/// Remove (when `clean`) and create the build directory.
pub fn prepare_build_dir(build_dir: &Path, clean: bool) -> Result<()> {
    if clean && build_dir.exists() {
        log::debug!("Cleaning build directory {}", build_dir.display());
        fs::remove_dir_all(build_dir)?;
    }
    fs::create_dir_all(build_dir)?;
    Ok(())
}

/// Run the full cycle for `source_dir`, returning the build directory.
pub fn build_project(
    ops: &dyn BuildOperations,
    source_dir: &Path,
    settings: &BuildSettings,
) -> Result<PathBuf> {
    let build_dir = source_dir.join(&settings.build_dir);
    prepare_build_dir(&build_dir, settings.clean)?;

    ops.configure(source_dir, &build_dir, settings)?;
    if !settings.no_build {
        ops.build(&build_dir, settings)?;
    }
    Ok(build_dir)
}
