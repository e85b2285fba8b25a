//! # Run Pipeline
//!
//! Ties planning, fetching, descriptor generation and building together.
//!
//! ## Single mode
//!
//! 1. Normalize the entry.
//! 2. Clone into `<work_dir>/<name>`, or handle the existing clone as the
//!    caller decided.
//! 3. Build in `<name>/<build_dir>`.
//!
//! ## Batch and profile mode
//!
//! 1. Plan the member list and resolve every fetch target. Nothing on disk
//!    changes until this succeeds.
//! 2. Create the batch directory and fetch members in plan order. Existing
//!    clones are updated; the first failure aborts the run.
//! 3. Write the aggregate `CMakeLists.txt`. Members without their own
//!    descriptor are reported and skipped; a missing entry descriptor is
//!    fatal.
//! 4. Build in `<batch_dir>/<build_dir>`.
//!
//! Progress is reported through a callback so the library stays silent and
//! the binary decides how to print it.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::cmake::{self, BuildOperations};
use crate::defaults::DESCRIPTOR_FILENAME;
use crate::descriptor;
use crate::error::{Error, Result};
use crate::options::{Mode, SetupOptions};
use crate::planner::{self, PlanRequest};
use crate::profiles::ProfileStore;
use crate::reference;
use crate::repository::{ExistingClone, FetchOutcome, RepositoryManager};

/// A step of a run, reported as it starts or finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A fetch is about to start.
    Fetching { name: String, url: String },
    /// A fetch finished.
    Fetched { name: String, outcome: FetchOutcome },
    /// The aggregate descriptor was written.
    DescriptorWritten { path: PathBuf },
    /// A member has no `CMakeLists.txt` and was left out of the aggregate.
    MemberSkipped { name: String },
    /// The configure/build cycle is about to start.
    Building { source_dir: PathBuf },
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Directory that was configured (the clone, or the batch directory).
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Short names in fetch order with what happened to each.
    pub fetched: Vec<(String, FetchOutcome)>,
    /// Members left out of the aggregate descriptor.
    pub skipped: Vec<String>,
}

pub struct Orchestrator<'a> {
    repositories: &'a RepositoryManager,
    builder: &'a dyn BuildOperations,
    work_dir: PathBuf,
}

impl<'a> Orchestrator<'a> {
    /// All relative paths in `SetupOptions` are taken relative to `work_dir`.
    pub fn new(
        repositories: &'a RepositoryManager,
        builder: &'a dyn BuildOperations,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repositories,
            builder,
            work_dir: work_dir.into(),
        }
    }

    /// Clone directory used in single mode.
    pub fn single_target_dir(&self, options: &SetupOptions) -> Result<PathBuf> {
        Ok(self.work_dir.join(reference::directory_name(&options.repo)?))
    }

    /// Batch directory under the working directory.
    ///
    /// The aggregate `CMakeLists.txt` is written there, so it must not be the
    /// working directory itself.
    fn batch_dir(&self, options: &SetupOptions) -> Result<PathBuf> {
        let batch_dir = self.work_dir.join(&options.batch_dir);
        if lexical(&batch_dir) == lexical(&self.work_dir) {
            return Err(Error::InvalidBatchDir {
                path: options.batch_dir.clone(),
            });
        }
        Ok(batch_dir)
    }

    /// Run single mode; `existing` says what to do with an existing clone.
    pub fn run_single(
        &self,
        options: &SetupOptions,
        existing: ExistingClone,
        progress: &mut dyn FnMut(&Progress),
    ) -> Result<RunReport> {
        let url = reference::normalize(&options.repo, options.protocol)?;
        let target = self.single_target_dir(options)?;
        let name = reference::short_name(&options.repo);

        progress(&Progress::Fetching {
            name: name.clone(),
            url: url.clone(),
        });
        let outcome = self.repositories.fetch(&url, &target, existing)?;
        progress(&Progress::Fetched {
            name: name.clone(),
            outcome,
        });

        progress(&Progress::Building {
            source_dir: target.clone(),
        });
        let build_dir = cmake::build_project(self.builder, &target, &options.build)?;

        Ok(RunReport {
            source_dir: target,
            build_dir,
            fetched: vec![(name, outcome)],
            skipped: Vec::new(),
        })
    }

    /// Run batch or profile mode.
    ///
    /// `configured_defaults` is the `batch.default_repos` list from
    /// configuration.
    pub fn run_batch(
        &self,
        options: &SetupOptions,
        profiles: &ProfileStore,
        configured_defaults: &[String],
        progress: &mut dyn FnMut(&Progress),
    ) -> Result<RunReport> {
        let source = options.mode.member_source().ok_or_else(|| Error::InvalidIdentifier {
            identifier: options.repo.clone(),
            reason: "batch run requested in single-repository mode".to_string(),
        })?;

        let request = PlanRequest {
            entry: options.repo.clone(),
            source,
            batch_dir: self.batch_dir(options)?,
        };
        let plan = planner::plan(&request, configured_defaults, profiles)?;
        let targets = plan.fetch_targets(options.protocol)?;
        let entry_name = plan.entry_name();
        log::debug!(
            "Batch plan for {}: {}",
            entry_name,
            plan.member_names().join(", ")
        );

        fs::create_dir_all(plan.source_directory())?;

        let mut fetched = Vec::with_capacity(targets.len());
        for target in &targets {
            progress(&Progress::Fetching {
                name: target.name.clone(),
                url: target.url.clone(),
            });
            let outcome = self
                .repositories
                .fetch(&target.url, &target.directory, ExistingClone::Update)?;
            progress(&Progress::Fetched {
                name: target.name.clone(),
                outcome,
            });
            fetched.push((target.name.clone(), outcome));
        }

        let member_names: Vec<String> = targets.iter().map(|t| t.name.clone()).collect();
        let aggregate = descriptor::generate(plan.source_directory(), &entry_name, &member_names);
        let path = descriptor::write(plan.source_directory(), &aggregate)?;
        progress(&Progress::DescriptorWritten { path });

        for name in &aggregate.skipped {
            log::warn!("Skipping {}: no {} found", name, DESCRIPTOR_FILENAME);
            progress(&Progress::MemberSkipped { name: name.clone() });
        }

        if !aggregate.entry_present {
            return Err(Error::MissingEntryDescriptor {
                path: plan.source_directory().join(&entry_name).join(DESCRIPTOR_FILENAME),
                name: entry_name,
            });
        }

        progress(&Progress::Building {
            source_dir: plan.source_directory().to_path_buf(),
        });
        let build_dir = cmake::build_project(self.builder, plan.source_directory(), &options.build)?;

        Ok(RunReport {
            source_dir: plan.source_directory().to_path_buf(),
            build_dir,
            fetched,
            skipped: aggregate.skipped,
        })
    }

    /// Dispatch on `options.mode`.
    pub fn run(
        &self,
        options: &SetupOptions,
        existing: ExistingClone,
        profiles: &ProfileStore,
        configured_defaults: &[String],
        progress: &mut dyn FnMut(&Progress),
    ) -> Result<RunReport> {
        match options.mode {
            Mode::Single => self.run_single(options, existing, progress),
            Mode::Batch { .. } | Mode::Profile(_) => {
                self.run_batch(options, profiles, configured_defaults, progress)
            }
        }
    }
}

/// `path` with `.` dropped and `..` folded into its parent, without touching
/// the disk.
fn lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
