//! # Error Handling
//!
//! This module defines the centralized error type for the `starlet-setup`
//! library. It uses `thiserror` to derive a single `Error` enum covering every
//! failure the planning and execution steps can produce, each variant carrying
//! enough context to print a useful diagnostic.
//!
//! Errors fall into two groups:
//!
//! - **Planning errors** (`InvalidIdentifier`, `ProfileNotFound`,
//!   `EmptyRepoList`, `DuplicateRepoName`, ...) are raised before any
//!   filesystem mutation or network call.
//! - **Execution errors** (`GitClone`, `GitCommand`, `Command`,
//!   `MissingEntryDescriptor`, ...) abort the current run.
//!
//! A configuration file that fails to parse is never fatal. It is reported as
//! a [`ConfigParseWarning`](crate::config::ConfigParseWarning) built from the
//! `ConfigParse` variant and loading continues with the next location.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for starlet-setup operations
#[derive(Error, Debug)]
pub enum Error {
    /// A repository identifier is neither URL-shaped nor `owner/name`.
    #[error("Invalid repository identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// A configuration file could not be parsed.
    #[error("Invalid configuration in {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The configuration file could not be written.
    #[error("Failed to write configuration file {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A named profile does not exist in the profile store.
    ///
    /// `available` holds the names that do exist so the caller can list them.
    #[error("Profile '{name}' not found")]
    ProfileNotFound {
        name: String,
        available: Vec<String>,
    },

    /// A profile or explicit batch list with no repositories in it.
    #[error("Repository list for '{name}' is empty")]
    EmptyRepoList { name: String },

    /// Profile names must contain at least one non-whitespace character.
    #[error("Invalid profile name '{name}'")]
    InvalidProfileName { name: String },

    /// Two members of a batch resolve to the same on-disk directory.
    #[error("Repositories '{first}' and '{second}' would both be cloned into '{name}'")]
    DuplicateRepoName {
        name: String,
        first: String,
        second: String,
    },

    /// A batch directory that is the working directory itself.
    #[error("Batch directory '{}' resolves to the working directory", path.display())]
    InvalidBatchDir { path: PathBuf },

    /// The entry repository of a batch has no `CMakeLists.txt`.
    #[error("Entry repository '{name}' has no CMakeLists.txt (expected {})", path.display())]
    MissingEntryDescriptor { name: String, path: PathBuf },

    /// An error occurred while cloning a Git repository.
    #[error("Git clone error for {url}: {message}")]
    GitClone { url: String, message: String },

    /// A git command other than clone failed.
    #[error("Git command failed in {}: {command} - {stderr}", dir.display())]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// An external build command exited unsuccessfully.
    #[error("Command failed ({status}): {command}{}", if stderr.is_empty() { String::new() } else { format!("\n{}", stderr) })]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// Required external tools are not installed.
    #[error("Missing required tools: {}", tools.join(", "))]
    MissingTools { tools: Vec<String> },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
