//! # Completions Command Implementation
//!
//! Prints a shell completion script generated by `clap_complete`, covering
//! every flag and subcommand (build types and profile actions included).
//!
//! ```bash
//! starlet-setup completions bash > ~/.local/share/bash-completion/completions/starlet-setup
//! starlet-setup completions zsh > ~/.zfunc/_starlet-setup
//! starlet-setup completions fish > ~/.config/fish/completions/starlet-setup.fish
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to `writer`.
fn write_completions(shell: Shell, writer: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, writer);
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(args.shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}
