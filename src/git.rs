use std::path::Path;

use crate::error::Error;
use crate::process::{self, CommandSpec};

/// Command line for cloning `url` into `target_dir`.
pub fn clone_command(url: &str, target_dir: &Path) -> CommandSpec {
    CommandSpec::new("git")
        .args(["clone", url])
        .path_arg(target_dir)
}

/// Command line for updating the clone at `repo_dir`.
pub fn pull_command(repo_dir: &Path) -> CommandSpec {
    CommandSpec::new("git").arg("pull").current_dir(repo_dir)
}

/// Clone a repository into `target_dir`.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone(url: &str, target_dir: &Path, verbose: bool) -> Result<(), Error> {
    if let Some(parent) = target_dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    process::run(&clone_command(url, target_dir), verbose).map_err(|e| match e {
        Error::Command { stderr, status, .. } => Error::GitClone {
            url: url.to_string(),
            message: explain_clone_failure(&stderr, &status),
        },
        other => other,
    })
}

/// Update an existing clone with `git pull`.
pub fn pull(repo_dir: &Path, verbose: bool) -> Result<(), Error> {
    let command = pull_command(repo_dir);
    process::run(&command, verbose).map_err(|e| match e {
        Error::Command { stderr, .. } => Error::GitCommand {
            command: command.to_string(),
            dir: repo_dir.to_path_buf(),
            stderr,
        },
        other => other,
    })
}

/// Turn git's stderr into a message, with guidance for auth failures.
fn explain_clone_failure(stderr: &str, status: &str) -> String {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        format!(
            "Authentication failed. Make sure you have access to the repository.\n\
            For private repos, ensure you have:\n\
            - SSH key added to ssh-agent (when using --ssh)\n\
            - Git credentials configured\n\
            - Personal access token set up\n\
            Error: {}",
            stderr
        )
    } else if stderr.is_empty() {
        format!("git exited with {}", status)
    } else {
        stderr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_clone_command() {
        let command = clone_command(
            "https://github.com/masonlet/starlet-math.git",
            Path::new("build-batch/starlet-math"),
        );
        assert_eq!(
            command.to_string(),
            "git clone https://github.com/masonlet/starlet-math.git build-batch/starlet-math"
        );
        assert_eq!(command.cwd, None);
    }

    #[test]
    fn test_pull_command_runs_inside_repo() {
        let command = pull_command(Path::new("starlet-math"));
        assert_eq!(command.to_string(), "git pull");
        assert_eq!(command.cwd, Some(PathBuf::from("starlet-math")));
    }

    #[test]
    fn test_explain_clone_failure_auth() {
        let message = explain_clone_failure(
            "git@github.com: Permission denied (publickey).",
            "exit status: 128",
        );
        assert!(message.starts_with("Authentication failed"));
        assert!(message.contains("Permission denied (publickey)"));
    }

    #[test]
    fn test_explain_clone_failure_passthrough() {
        let message = explain_clone_failure("fatal: repository not found", "exit status: 128");
        assert_eq!(message, "fatal: repository not found");
    }

    #[test]
    fn test_explain_clone_failure_empty_stderr() {
        let message = explain_clone_failure("", "exit status: 128");
        assert_eq!(message, "git exited with exit status: 128");
    }

    // Note: Integration tests for clone and pull would require actual git
    // repositories and network access, so they're omitted here
}
