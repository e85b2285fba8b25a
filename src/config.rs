//! # Persisted Configuration
//!
//! This module defines the `.starlet-setup.json` configuration document and
//! the logic for finding, loading, and saving it.
//!
//! ## Namespaces
//!
//! - **`defaults`**: scalar option overrides (protocol preference, build type,
//!   build/batch directory names, verbosity, extra CMake arguments).
//! - **`profiles`** and **`batch.default_repos`**: named repository lists and
//!   the list batch mode uses when none is given on the command line.
//!
//! ## Locations
//!
//! Searched in order, first usable file wins:
//! 1. `./.starlet-setup.json` (project-local)
//! 2. `~/.starlet-setup.json` (user)
//!
//! A file that cannot be read or parsed produces a [`ConfigParseWarning`] and
//! the search moves on. When nothing usable is found the built-in defaults
//! apply.
//!
//! ## Writing
//!
//! Saves go to the project-local file if it exists, otherwise to the user
//! file. Writes are atomic (write to a temp file, then rename) so a
//! half-written configuration is never observable.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cmake::BuildType;
use crate::defaults::{self, CONFIG_FILENAME, DEFAULT_PROFILE};
use crate::error::{Error, Result};

/// The full configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Option overrides applied beneath explicit CLI flags.
    #[serde(default, skip_serializing_if = "Defaults::is_empty")]
    pub defaults: Defaults,

    /// Named repository lists, kept in lexicographic order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, Vec<String>>,

    /// Batch-mode settings.
    #[serde(default, skip_serializing_if = "BatchSettings::is_empty")]
    pub batch: BatchSettings,

    /// Top-level keys this tool does not use, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `defaults.*` namespace. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "mono_dir")]
    pub batch_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_build: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmake_arg: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Defaults {
    fn is_empty(&self) -> bool {
        self == &Defaults::default()
    }
}

/// The `batch.*` namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Repositories batch mode clones when `--repos` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_repos: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchSettings {
    fn is_empty(&self) -> bool {
        self.default_repos.is_none() && self.extra.is_empty()
    }
}

impl Config {
    /// The document `init-config` writes: every default spelled out plus a
    /// `default` profile holding the built-in library set.
    pub fn starter() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            DEFAULT_PROFILE.to_string(),
            defaults::builtin_default_repos(),
        );

        Self {
            defaults: Defaults {
                ssh: Some(false),
                build_type: Some(BuildType::Debug),
                build_dir: Some(defaults::DEFAULT_BUILD_DIR.to_string()),
                batch_dir: Some(defaults::DEFAULT_BATCH_DIR.to_string()),
                no_build: Some(false),
                verbose: Some(false),
                cmake_arg: Some(Vec::new()),
                extra: Map::new(),
            },
            profiles,
            batch: BatchSettings::default(),
            extra: Map::new(),
        }
    }

    /// Configured batch default list; empty when configuration supplies none.
    pub fn default_repos(&self) -> &[String] {
        self.batch.default_repos.as_deref().unwrap_or(&[])
    }

    /// Parse a configuration document from JSON text.
    pub fn parse(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize to the on-disk representation (pretty JSON, trailing newline).
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

/// A configuration file that was found but could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigParseWarning {
    /// The file that triggered the warning.
    pub path: PathBuf,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for ConfigParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid JSON in {}: {}", self.path.display(), self.message)
    }
}

impl From<ConfigParseWarning> for Error {
    fn from(warning: ConfigParseWarning) -> Self {
        Error::ConfigParse {
            path: warning.path,
            message: warning.message,
        }
    }
}

/// Result of loading configuration.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    /// The configuration in effect (built-in defaults when nothing loaded).
    pub config: Config,
    /// The file the configuration came from, if any.
    pub path: Option<PathBuf>,
    /// Files that were skipped because they could not be used.
    pub warnings: Vec<ConfigParseWarning>,
}

/// Where configuration files are looked for and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    /// Project-local file, checked first.
    pub project: PathBuf,
    /// User-level file, checked second.
    pub user: Option<PathBuf>,
}

impl ConfigLocations {
    /// Standard locations: the current directory and the home directory.
    pub fn discover() -> Self {
        Self {
            project: PathBuf::from(CONFIG_FILENAME),
            user: defaults::user_config_path(),
        }
    }

    /// Locations rooted at explicit directories.
    pub fn new(project_dir: &Path, home_dir: Option<&Path>) -> Self {
        Self {
            project: project_dir.join(CONFIG_FILENAME),
            user: home_dir.map(|home| home.join(CONFIG_FILENAME)),
        }
    }

    /// Files in search order.
    pub fn search_order(&self) -> Vec<&Path> {
        let mut paths = vec![self.project.as_path()];
        if let Some(user) = &self.user {
            paths.push(user.as_path());
        }
        paths
    }

    /// The file a save should go to.
    ///
    /// Project-local if it already exists, otherwise the user file, otherwise
    /// project-local when no home directory is known.
    pub fn write_target(&self) -> PathBuf {
        if self.project.exists() {
            return self.project.clone();
        }
        self.user.clone().unwrap_or_else(|| self.project.clone())
    }
}

/// Load configuration from the given locations.
///
/// Never fails: unusable files become warnings.
pub fn load(locations: &ConfigLocations) -> LoadedConfig {
    let mut warnings = Vec::new();

    for path in locations.search_order() {
        if !path.exists() {
            continue;
        }
        match read_file(path) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", path.display());
                return LoadedConfig {
                    config,
                    path: Some(path.to_path_buf()),
                    warnings,
                };
            }
            Err(warning) => {
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    log::debug!("No configuration file found, using built-in defaults");
    LoadedConfig {
        config: Config::default(),
        path: None,
        warnings,
    }
}

/// Read and parse a single configuration file.
pub fn read_file(path: &Path) -> std::result::Result<Config, ConfigParseWarning> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigParseWarning {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Config::parse(&contents).map_err(|e| ConfigParseWarning {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a configuration file atomically.
///
/// Creates parent directories if needed.
pub fn write_atomic(path: &Path, config: &Config) -> Result<()> {
    let write_error = |path: &Path, source: std::io::Error| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
    }

    let contents = config.to_json()?;

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| write_error(&temp_path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| write_error(&temp_path, e))?;
    file.sync_all().map_err(|e| write_error(&temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| write_error(path, e))?;
    log::debug!("Wrote configuration to {}", path.display());
    Ok(())
}
