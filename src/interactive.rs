//! Interactive completion of a [`RunRequest`].
//!
//! Questions are asked in a fixed order and only for fields the command line
//! left unset, except build type, build directory and extra CMake arguments,
//! which are always offered with the current value as the default. Configured
//! `defaults.*` values are the defaults of the matching questions, so an
//! empty answer keeps what the configuration says.
//!
//! Terminal I/O goes through the [`Prompter`] trait.

use crate::cmake::BuildType;
use crate::config::Defaults;
use crate::defaults::DEFAULT_BUILD_DIR;
use crate::error::Result;
use crate::options::{Mode, RunRequest};

/// Line-oriented question/answer interface.
pub trait Prompter {
    /// Ask a free-form question; the answer is trimmed.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Ask with a default returned for an empty answer.
    fn ask_default(&mut self, prompt: &str, default: &str) -> Result<String>;

    fn ask_yes_no(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Ask until `accept` returns a value.
fn ask_until<T, F>(prompter: &mut dyn Prompter, prompt: &str, accept: F) -> Result<T>
where
    F: Fn(&str) -> Option<T>,
{
    loop {
        let answer = prompter.ask(prompt)?;
        if let Some(value) = accept(answer.trim()) {
            return Ok(value);
        }
    }
}

fn non_empty(answer: &str) -> Option<String> {
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Fill the unset fields of `request` by prompting.
pub fn fill_interactively(
    mut request: RunRequest,
    defaults: &Defaults,
    prompter: &mut dyn Prompter,
) -> Result<RunRequest> {
    if request.repo.as_deref().map_or(true, |r| r.trim().is_empty()) {
        request.repo = Some(ask_until(prompter, "Enter repository (user/repo or URL)", non_empty)?);
    }

    if request.ssh.is_none() {
        request.ssh = Some(prompter.ask_yes_no("Use SSH?", defaults.ssh.unwrap_or(false))?);
    }
    if request.verbose.is_none() {
        request.verbose = Some(prompter.ask_yes_no("Verbose?", defaults.verbose.unwrap_or(false))?);
    }
    if request.clean.is_none() {
        request.clean = Some(prompter.ask_yes_no("Clean build directory if exists?", false)?);
    }

    if request.mode.is_none() {
        let batch = ask_until(prompter, "Select mode: (1) Single repo (2) Batch", |a| match a {
            "1" => Some(false),
            "2" => Some(true),
            _ => None,
        })?;
        request.mode = Some(if batch { ask_batch_source(prompter)? } else { Mode::Single });
    }

    let current_type = request
        .build_type
        .or(defaults.build_type)
        .unwrap_or(BuildType::Release);
    request.build_type = Some(loop {
        let answer = prompter.ask_default("Build type", current_type.as_str())?;
        match answer.parse::<BuildType>() {
            Ok(build_type) => break build_type,
            Err(message) => log::warn!("{}", message),
        }
    });

    let current_dir = request
        .build_dir
        .clone()
        .or_else(|| defaults.build_dir.clone())
        .unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string());
    request.build_dir = Some(prompter.ask_default("Build directory", &current_dir)?);

    let current_args = request
        .cmake_args
        .clone()
        .or_else(|| defaults.cmake_arg.clone())
        .unwrap_or_default()
        .join(" ");
    let extra = prompter.ask_default(
        "Additional CMake args (space separated, e.g. -DBUILD_TESTS=ON)",
        &current_args,
    )?;
    request.cmake_args = Some(extra.split_whitespace().map(str::to_string).collect());

    if request.no_build.is_none() {
        request.no_build = Some(prompter.ask_yes_no(
            "Configure only (skip build)?",
            defaults.no_build.unwrap_or(false),
        )?);
    }

    Ok(request)
}

fn ask_batch_source(prompter: &mut dyn Prompter) -> Result<Mode> {
    let use_profile = ask_until(prompter, "Batch: (1) Use profile (2) Manual repo list", |a| match a {
        "1" => Some(true),
        "2" => Some(false),
        _ => None,
    })?;

    if use_profile {
        let name = ask_until(prompter, "Profile name", non_empty)?;
        return Ok(Mode::Profile(name));
    }

    let repos = ask_until(
        prompter,
        "Enter repos (space separated, e.g. user/lib1 user/lib2)",
        |a| {
            let repos: Vec<String> = a.split_whitespace().map(str::to_string).collect();
            (!repos.is_empty()).then_some(repos)
        },
    )?;
    Ok(Mode::Batch { repos: Some(repos) })
}
