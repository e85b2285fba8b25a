//! # CLI Command Implementations
//!
//! One file per command. Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `starlet_setup` library.
//!
//! `run` is the default command (no subcommand given); `prompt` backs the
//! library's interactive mode with `dialoguer`.

pub mod completions;
pub mod init_config;
pub mod profile;
pub mod prompt;
pub mod run;
