//! # Profile Store
//!
//! Named, persisted lists of repository identifiers. Profiles live in the
//! `profiles` namespace of the configuration document, so the store keeps the
//! whole document and writes it back in one piece; saving a profile never
//! drops the `defaults` or `batch` sections, nor keys this tool ignores.
//!
//! Profiles are listed in lexicographic order of their names.
//!
//! ## Overwrites
//!
//! [`ProfileStore::add`] replaces an existing profile without asking. Callers
//! that want confirmation check [`ProfileStore::contains`] first.

use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigParseWarning};
use crate::error::{Error, Result};

/// A persisted mapping of profile names to repository lists.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    document: Config,
    path: PathBuf,
}

impl ProfileStore {
    /// Creates an empty store that will persist to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_config(Config::default(), path)
    }

    /// Wraps an already-loaded configuration document.
    pub fn from_config(document: Config, path: impl Into<PathBuf>) -> Self {
        Self {
            document,
            path: path.into(),
        }
    }

    /// Loads the store from a single file.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file
    /// yields an empty store plus a warning; saving afterwards replaces it.
    pub fn load(path: impl Into<PathBuf>) -> (Self, Option<ConfigParseWarning>) {
        let path = path.into();
        if !path.exists() {
            return (Self::new(path), None);
        }

        match config::read_file(&path) {
            Ok(document) => (Self::from_config(document, path), None),
            Err(warning) => {
                log::warn!("{}", warning);
                (Self::new(path), Some(warning))
            }
        }
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a profile with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.document.profiles.contains_key(name)
    }

    /// Repository list of a profile.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.document.profiles.get(name).map(Vec::as_slice)
    }

    /// Profile names in listing order.
    pub fn names(&self) -> Vec<String> {
        self.document.profiles.keys().cloned().collect()
    }

    /// All profiles in listing order.
    pub fn list(&self) -> Vec<(&str, &[String])> {
        self.document
            .profiles
            .iter()
            .map(|(name, repos)| (name.as_str(), repos.as_slice()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.document.profiles.is_empty()
    }

    /// Inserts or replaces a profile, returning the list it replaced.
    pub fn add(&mut self, name: &str, repos: Vec<String>) -> Result<Option<Vec<String>>> {
        if name.trim().is_empty() {
            return Err(Error::InvalidProfileName {
                name: name.to_string(),
            });
        }
        if repos.is_empty() {
            return Err(Error::EmptyRepoList {
                name: name.to_string(),
            });
        }

        Ok(self.document.profiles.insert(name.to_string(), repos))
    }

    /// Removes a profile, returning its list, or `None` if it was absent.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.document.profiles.remove(name)
    }

    /// Persists the whole document atomically.
    pub fn save(&self) -> Result<()> {
        config::write_atomic(&self.path, &self.document)
    }
}
