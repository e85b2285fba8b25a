//! # Starlet Setup Library
//!
//! Core functionality of the `starlet-setup` command-line tool: cloning one or
//! more CMake repositories and driving configure/build, either for a single
//! repository or for a batch of libraries aggregated under one generated root
//! `CMakeLists.txt`.
//!
//! ## Quick Example
//!
//! ```
//! use starlet_setup::planner::{self, MemberSource, PlanRequest};
//! use starlet_setup::profiles::ProfileStore;
//! use starlet_setup::reference::{self, Protocol};
//!
//! assert_eq!(
//!     reference::normalize("masonlet/starlet-math", Protocol::Https).unwrap(),
//!     "https://github.com/masonlet/starlet-math.git"
//! );
//!
//! let request = PlanRequest {
//!     entry: "alice/app".to_string(),
//!     source: MemberSource::Explicit(vec!["lib1".to_string(), "bob/lib2".to_string()]),
//!     batch_dir: "build-batch".into(),
//! };
//! let plan = planner::plan(&request, &[], &ProfileStore::new(".starlet-setup.json")).unwrap();
//! assert_eq!(plan.members, ["alice/lib1", "bob/lib2", "alice/app"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **References (`reference`)**: repository identifiers (`owner/name` or
//!   URLs), their fetch URLs and short names.
//! - **Configuration (`config`, `profiles`)**: the `.starlet-setup.json`
//!   document holding option defaults and named repository lists.
//! - **Planning (`planner`)**: which repositories a batch run fetches, in what
//!   order, and where.
//! - **Aggregation (`descriptor`)**: the generated root `CMakeLists.txt`.
//! - **Execution (`repository`, `git`, `cmake`, `process`)**: clone/update and
//!   configure/build, behind traits that tests replace with mocks.
//! - **Pipeline (`orchestrator`)**: the single and batch run sequences.
//!
//! ## Execution Flow
//!
//! 1. **Options**: command-line flags (or interactive answers) are layered
//!    over configured defaults.
//! 2. **Planning**: the member list is resolved and validated before anything
//!    touches the disk.
//! 3. **Fetching**: members are cloned or updated in plan order.
//! 4. **Aggregation**: the root `CMakeLists.txt` is written.
//! 5. **Build**: CMake configures and builds the tree.

pub mod cmake;
pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod interactive;
pub mod options;
pub mod orchestrator;
pub mod output;
pub mod planner;
pub mod process;
pub mod profiles;
pub mod reference;
pub mod repository;
pub mod suggestions;

#[cfg(test)]
mod reference_proptest;
