//! # Repository Fetching
//!
//! This module provides the `RepositoryManager`, which brings a repository onto
//! disk: it clones into the target directory if nothing is there, and updates
//! the existing clone otherwise.
//!
//! ## Design
//!
//! Git access goes through the **`GitOperations`** trait. The application uses
//! `DefaultGitOperations`, which wraps the system `git` command; tests swap in
//! a mock so fetch sequencing can be checked without git or a network.

use std::path::Path;

use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target_dir`, which must not exist yet.
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Pulls the latest changes into an existing clone.
    fn pull(&self, repo_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
pub struct DefaultGitOperations {
    verbose: bool,
}

impl DefaultGitOperations {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl GitOperations for DefaultGitOperations {
    fn clone_repo(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone(url, target_dir, self.verbose)
    }

    fn pull(&self, repo_dir: &Path) -> Result<()> {
        crate::git::pull(repo_dir, self.verbose)
    }
}

/// What to do when the target directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingClone {
    /// Run `git pull` in it.
    Update,
    /// Leave it untouched.
    Keep,
}

/// What a fetch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Cloned,
    Updated,
    Kept,
}

/// The main entry point for bringing repositories onto disk.
pub struct RepositoryManager {
    git_ops: Box<dyn GitOperations>,
}

impl RepositoryManager {
    /// Creates a new `RepositoryManager` backed by the system `git`.
    pub fn new(verbose: bool) -> Self {
        Self {
            git_ops: Box::new(DefaultGitOperations::new(verbose)),
        }
    }

    /// Creates a `RepositoryManager` with a custom `GitOperations`.
    ///
    /// This is primarily used for testing to inject mock operations.
    pub fn with_operations(git_ops: Box<dyn GitOperations>) -> Self {
        Self { git_ops }
    }

    /// Clone-if-absent, update-if-present.
    pub fn fetch(&self, url: &str, target_dir: &Path, existing: ExistingClone) -> Result<FetchOutcome> {
        if !target_dir.exists() {
            log::debug!("Cloning {} into {}", url, target_dir.display());
            self.git_ops.clone_repo(url, target_dir)?;
            return Ok(FetchOutcome::Cloned);
        }

        match existing {
            ExistingClone::Update => {
                log::debug!("Updating existing clone {}", target_dir.display());
                self.git_ops.pull(target_dir)?;
                Ok(FetchOutcome::Updated)
            }
            ExistingClone::Keep => {
                log::debug!("Keeping existing clone {}", target_dir.display());
                Ok(FetchOutcome::Kept)
            }
        }
    }
}
