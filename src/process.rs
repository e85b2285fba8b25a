//! External process execution.
//!
//! Every git and cmake invocation is described by a [`CommandSpec`] first, so
//! command lines can be inspected in tests without running anything, and then
//! executed with [`run`]. Execution is blocking and sequential.
//!
//! In quiet mode output is captured and only surfaced if the command fails.
//! In verbose mode the command line is echoed and the child inherits the
//! terminal.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// A command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Run a command to completion.
///
/// Fails with `Error::Command` carrying the captured diagnostic when the
/// command exits unsuccessfully, and with `Error::MissingTools` when the
/// program cannot be found.
pub fn run(invocation: &CommandSpec, verbose: bool) -> Result<()> {
    log::debug!("Running: {}", invocation);
    if verbose {
        println!("Running: {}", invocation);
        if let Some(cwd) = &invocation.cwd {
            println!("  in directory: {}", cwd.display());
        }
    }

    let mut command = invocation.to_command();
    let spawn_error = |e: io::Error| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::MissingTools {
                tools: vec![invocation.program.clone()],
            }
        } else {
            Error::Io(e)
        }
    };

    if verbose {
        let status = command.status().map_err(spawn_error)?;
        if !status.success() {
            return Err(Error::Command {
                command: invocation.to_string(),
                status: status.to_string(),
                stderr: String::new(),
            });
        }
        return Ok(());
    }

    let output = command.output().map_err(spawn_error)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // Some tools (cmake among them) report failures on stdout
        let diagnostic = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(Error::Command {
            command: invocation.to_string(),
            status: output.status.to_string(),
            stderr: diagnostic,
        });
    }
    Ok(())
}

/// Check that every tool is on `PATH`, reporting all missing ones at once.
pub fn check_prerequisites(tools: &[&str]) -> Result<()> {
    let mut missing = Vec::new();

    for tool in tools {
        match which::which(tool) {
            Ok(path) => log::debug!("Found {} at {}", tool, path.display()),
            Err(_) => missing.push(tool.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingTools { tools: missing })
    }
}
