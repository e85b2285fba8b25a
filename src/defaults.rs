//! Default values for starlet-setup.
//!
//! This module provides centralized default values used across the library
//! and the CLI, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Name of the persisted configuration file, both project-local and in `$HOME`.
pub const CONFIG_FILENAME: &str = ".starlet-setup.json";

/// Hosting service that bare `owner/name` identifiers expand against.
pub const DEFAULT_HOST: &str = "github.com";

/// Suffix appended to generated fetch URLs and stripped from short names.
pub const REPO_SUFFIX: &str = ".git";

/// Build-file descriptor each repository is expected to carry at its root.
pub const DESCRIPTOR_FILENAME: &str = "CMakeLists.txt";

/// Build directory created inside each source tree.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Directory that batch and profile runs clone into.
pub const DEFAULT_BATCH_DIR: &str = "build-batch";

/// Profile used by `--profile` when no name is given.
pub const DEFAULT_PROFILE: &str = "default";

/// Library set used by batch mode when configuration supplies no default list.
pub const BUILTIN_DEFAULT_REPOS: [&str; 7] = [
    "masonlet/starlet-math",
    "masonlet/starlet-logger",
    "masonlet/starlet-controls",
    "masonlet/starlet-scene",
    "masonlet/starlet-graphics",
    "masonlet/starlet-serializer",
    "masonlet/starlet-engine",
];

/// Returns the built-in default repositories as owned identifiers.
pub fn builtin_default_repos() -> Vec<String> {
    BUILTIN_DEFAULT_REPOS.iter().map(|r| r.to_string()).collect()
}

/// Returns the user-level configuration path (`~/.starlet-setup.json`).
///
/// `None` when the platform home directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILENAME))
}
