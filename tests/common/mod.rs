//! Shared test utilities for CLI E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_project_config(configs::TWO_PROFILES);
//!     fixture.command().args(["profile", "list"]).assert().success();
//! }
//! ```
//!
//! Every command runs with an isolated `HOME` and working directory, and
//! with colors disabled so output can be matched on plain `[TAG]` prefixes.

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration documents for testing.
#[allow(dead_code)]
pub mod configs {
    /// Two profiles, no defaults.
    pub const TWO_PROFILES: &str = r#"{
  "profiles": {
    "audio": ["masonlet/starlet-audio"],
    "graphics": ["masonlet/starlet-graphics", "starlet-math"]
  }
}
"#;

    /// Option defaults only.
    pub const RELEASE_DEFAULTS: &str = r#"{
  "defaults": {
    "build_type": "Release",
    "build_dir": "out",
    "cmake_arg": ["-DBUILD_TESTS=ON"]
  }
}
"#;

    /// Not valid JSON.
    pub const INVALID_JSON: &str = "{ \"profiles\": [";
}

/// A temporary working directory with its own `HOME`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("work")
            .create_dir_all()
            .expect("Failed to create work directory");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home directory");
        Self { temp_dir }
    }

    /// The working directory commands run in.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// The `HOME` commands run with.
    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.path().join(".starlet-setup.json")
    }

    pub fn home_config_path(&self) -> PathBuf {
        self.home().join(".starlet-setup.json")
    }

    /// Write `./.starlet-setup.json`.
    pub fn with_project_config(self, content: &str) -> Self {
        std::fs::write(self.project_config_path(), content).expect("Failed to write config file");
        self
    }

    /// Write `~/.starlet-setup.json`.
    #[allow(dead_code)]
    pub fn with_home_config(self, content: &str) -> Self {
        std::fs::write(self.home_config_path(), content).expect("Failed to write config file");
        self
    }

    /// Add a file relative to the working directory.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("work")
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create a command configured to run in this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("starlet-setup");
        cmd.current_dir(self.path())
            .env("HOME", self.home())
            .env("USERPROFILE", self.home())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("CLICOLOR_FORCE");
        cmd
    }

    /// Create a command whose `PATH` contains nothing, so no tool is found.
    #[allow(dead_code)]
    pub fn command_without_tools(&self) -> assert_cmd::Command {
        let empty = self.temp_dir.path().join("empty-bin");
        std::fs::create_dir_all(&empty).expect("Failed to create empty bin directory");
        let mut cmd = self.command();
        cmd.env("PATH", empty);
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fake `git` and `cmake` executables that record their arguments.
///
/// - `git clone URL DIR` creates `DIR` with a `CMakeLists.txt`, unless the
///   directory name is listed in `STARLET_FAKE_NO_DESCRIPTOR` (space
///   separated), and fails if it equals `STARLET_FAKE_FAIL_CLONE`.
/// - `git pull` and `cmake` succeed; `cmake` fails with a diagnostic on
///   stdout when `STARLET_FAKE_CMAKE_FAIL` is set.
#[cfg(unix)]
#[allow(dead_code)]
pub mod fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> "$STARLET_FAKE_LOG"
if [ "$1" = "clone" ]; then
  name=$(basename "$3")
  if [ -n "$STARLET_FAKE_FAIL_CLONE" ] && [ "$name" = "$STARLET_FAKE_FAIL_CLONE" ]; then
    echo "fatal: repository '$2' not found" >&2
    exit 128
  fi
  mkdir -p "$3"
  case " $STARLET_FAKE_NO_DESCRIPTOR " in
    *" $name "*) ;;
    *) echo "project($name)" > "$3/CMakeLists.txt" ;;
  esac
fi
exit 0
"#;

    const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "cmake $*" >> "$STARLET_FAKE_LOG"
if [ -n "$STARLET_FAKE_CMAKE_FAIL" ]; then
  echo "CMake Error: could not find toolchain"
  exit 1
fi
exit 0
"#;

    fn install(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        std::fs::write(&path, script).expect("Failed to write fake tool");
        let mut permissions = std::fs::metadata(&path)
            .expect("Failed to stat fake tool")
            .permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).expect("Failed to chmod fake tool");
    }

    impl TestFixture {
        pub fn tool_log_path(&self) -> PathBuf {
            self.temp_dir.path().join("tools.log")
        }

        /// Contents of the tool invocation log.
        pub fn tool_log(&self) -> String {
            std::fs::read_to_string(self.tool_log_path()).unwrap_or_default()
        }

        /// Create a command with the fake tools first on `PATH`.
        pub fn command_with_fake_tools(&self) -> assert_cmd::Command {
            let bin = self.temp_dir.path().join("fake-bin");
            std::fs::create_dir_all(&bin).expect("Failed to create fake bin directory");
            install(&bin, "git", FAKE_GIT);
            install(&bin, "cmake", FAKE_CMAKE);

            let path = match std::env::var_os("PATH") {
                Some(existing) => {
                    let mut paths = vec![bin.clone()];
                    paths.extend(std::env::split_paths(&existing));
                    std::env::join_paths(paths).expect("Failed to build PATH")
                }
                None => bin.clone().into_os_string(),
            };

            let mut cmd = self.command();
            cmd.env("PATH", path)
                .env("STARLET_FAKE_LOG", self.tool_log_path())
                .env_remove("STARLET_FAKE_NO_DESCRIPTOR")
                .env_remove("STARLET_FAKE_FAIL_CLONE")
                .env_remove("STARLET_FAKE_CMAKE_FAIL");
            cmd
        }
    }
}

#[allow(dead_code)]
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}
