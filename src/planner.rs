//! # Batch Planning
//!
//! Decides which repositories a batch or profile run fetches, and where.
//!
//! Given the entry repository and one member source, the planner:
//!
//! 1. Derives the entry's owner, used to qualify bare names such as
//!    `starlet-math` into `owner/starlet-math`.
//! 2. Selects the source list: explicit list, then named profile, then the
//!    configured default list, then the built-in default list.
//! 3. Deduplicates by exact identifier equality, keeping first-seen order.
//! 4. Appends the entry unless the list already contains it. The entry is
//!    never fetched twice; when appended it is last, otherwise it keeps its
//!    position.
//!
//! Planning is pure. [`BatchPlan::fetch_targets`] then resolves each member
//! to a URL and a clone directory, still without touching the disk, so that
//! every planning error surfaces before anything is cloned.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::defaults::builtin_default_repos;
use crate::error::{Error, Result};
use crate::profiles::ProfileStore;
use crate::reference::{self, Protocol};

/// Where the member list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSource {
    /// Repositories given on the command line.
    Explicit(Vec<String>),
    /// A named profile from the profile store.
    Profile(String),
    /// Configured default list, or the built-in list when none is configured.
    Defaults,
}

/// Which list a plan was actually built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOrigin {
    Explicit,
    Profile(String),
    ConfiguredDefaults,
    BuiltInDefaults,
}

/// Inputs to [`plan`].
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// The entry repository, already qualified with an owner or URL-shaped.
    pub entry: String,
    pub source: MemberSource,
    /// Directory the members are cloned into.
    pub batch_dir: PathBuf,
}

/// The resolved set of repositories for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub entry: String,
    /// Deduplicated, in fetch order; contains `entry` exactly once.
    pub members: Vec<String>,
    pub source_directory: PathBuf,
    pub origin: PlanOrigin,
}

/// One member resolved to a fetch URL and a clone directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub identifier: String,
    pub url: String,
    pub name: String,
    pub directory: PathBuf,
}

/// Build a plan.
///
/// `configured_defaults` is the `batch.default_repos` list; pass an empty
/// slice when configuration supplies none.
pub fn plan(
    request: &PlanRequest,
    configured_defaults: &[String],
    profiles: &ProfileStore,
) -> Result<BatchPlan> {
    let owner = reference::owner(&request.entry).ok_or_else(|| Error::InvalidIdentifier {
        identifier: request.entry.clone(),
        reason: "cannot determine the owner of the entry repository".to_string(),
    })?;

    let (source_list, origin) = select_source(&request.source, configured_defaults, profiles)?;
    log::debug!(
        "Planning batch for {} from {:?} ({} listed)",
        request.entry,
        origin,
        source_list.len()
    );

    let qualified = source_list
        .iter()
        .map(|identifier| reference::qualify(identifier, &owner));
    let members = with_entry(dedup_preserving_order(qualified), &request.entry);

    Ok(BatchPlan {
        entry: request.entry.clone(),
        members,
        source_directory: request.batch_dir.clone(),
        origin,
    })
}

fn select_source(
    source: &MemberSource,
    configured_defaults: &[String],
    profiles: &ProfileStore,
) -> Result<(Vec<String>, PlanOrigin)> {
    match source {
        MemberSource::Explicit(repos) => {
            if repos.is_empty() {
                return Err(Error::EmptyRepoList {
                    name: "--repos".to_string(),
                });
            }
            Ok((repos.clone(), PlanOrigin::Explicit))
        }
        MemberSource::Profile(name) => match profiles.get(name) {
            Some(repos) => Ok((repos.to_vec(), PlanOrigin::Profile(name.clone()))),
            None => Err(Error::ProfileNotFound {
                name: name.clone(),
                available: profiles.names(),
            }),
        },
        MemberSource::Defaults if !configured_defaults.is_empty() => {
            Ok((configured_defaults.to_vec(), PlanOrigin::ConfiguredDefaults))
        }
        MemberSource::Defaults => Ok((builtin_default_repos(), PlanOrigin::BuiltInDefaults)),
    }
}

/// Remove repeated identifiers, keeping the first occurrence of each.
pub fn dedup_preserving_order<I>(identifiers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut members: Vec<String> = Vec::new();
    for identifier in identifiers {
        if !members.contains(&identifier) {
            members.push(identifier);
        }
    }
    members
}

fn with_entry(mut members: Vec<String>, entry: &str) -> Vec<String> {
    if !members.iter().any(|m| m == entry) {
        members.push(entry.to_string());
    }
    members
}

impl BatchPlan {
    /// Short name of the entry repository.
    pub fn entry_name(&self) -> String {
        reference::short_name(&self.entry)
    }

    /// Short names of all members, in plan order.
    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| reference::short_name(m)).collect()
    }

    /// Resolve every member to a fetch URL and a directory under the batch
    /// directory.
    ///
    /// Fails on the first identifier that cannot be normalized, and when two
    /// members would share a clone directory.
    pub fn fetch_targets(&self, protocol: Protocol) -> Result<Vec<FetchTarget>> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut targets = Vec::with_capacity(self.members.len());

        for identifier in &self.members {
            let url = reference::normalize(identifier, protocol)?;
            let name = reference::directory_name(identifier)?;
            if let Some(first) = seen.insert(name.clone(), identifier) {
                return Err(Error::DuplicateRepoName {
                    name,
                    first: first.to_string(),
                    second: identifier.clone(),
                });
            }
            targets.push(FetchTarget {
                identifier: identifier.clone(),
                url,
                directory: self.source_directory.join(&name),
                name,
            });
        }
        Ok(targets)
    }

    /// Directory this plan clones into.
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }
}
