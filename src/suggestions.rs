//! # Error Suggestions
//!
//! Helpers that turn library errors into messages with hints. Errors should
//! tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starlet_setup::suggestions;
//!
//! orchestrator.run(...).map_err(suggestions::explain)?;
//! ```

use std::path::Path;

use crate::defaults::CONFIG_FILENAME;
use crate::error::Error;

/// Error for a profile that does not exist.
///
/// Lists the profiles that do exist, suggests a close match, or explains how
/// to create one when there are none.
pub fn profile_not_found(name: &str, available: &[String]) -> anyhow::Error {
    if available.is_empty() {
        return anyhow::anyhow!(
            "Profile '{name}' not found\n\n\
             hint: No profiles are configured yet\n\
             hint: Create one with 'starlet-setup profile add {name} <REPO>...'\n\
             hint: Or run 'starlet-setup init-config' to write a starter config with a 'default' profile"
        );
    }

    let candidates: Vec<&str> = available.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(name, &candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Profile '{name}' not found{did_you_mean}\n\n\
         Available profiles: {list}\n\
         hint: Run 'starlet-setup profile list' to see their repositories",
        list = available.join(", ")
    )
}

/// Error for tools missing from `PATH`.
pub fn missing_tools(tools: &[String]) -> anyhow::Error {
    let hints: Vec<String> = tools
        .iter()
        .map(|tool| match tool.as_str() {
            "git" => "hint: Install git from https://git-scm.com/downloads".to_string(),
            "cmake" => "hint: Install CMake from https://cmake.org/download/".to_string(),
            other => format!("hint: Install '{other}' and make sure it is on your PATH"),
        })
        .collect();

    anyhow::anyhow!(
        "Missing required tools: {tools}\n\n{hints}",
        tools = tools.join(", "),
        hints = hints.join("\n")
    )
}

/// Error for an entry repository that is not `owner/name` or a URL.
pub fn invalid_identifier(identifier: &str, reason: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid repository identifier '{identifier}': {reason}\n\n\
         hint: Use owner/name (e.g. 'masonlet/starlet-samples')\n\
         hint: Or a full URL (e.g. 'https://github.com/owner/name.git' or 'git@github.com:owner/name.git')"
    )
}

/// Error for an entry repository that cannot act as the aggregate's root.
pub fn missing_entry_descriptor(name: &str, path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Entry repository '{name}' has no CMakeLists.txt (expected {path})\n\n\
         hint: The entry repository must be a CMake project\n\
         hint: Check the repository name, or run it in single mode to inspect the clone",
        path = path.display()
    )
}

/// Error for an unwritable configuration file.
pub fn config_write_failed(path: &Path, source: &std::io::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Failed to write configuration file {path}: {source}\n\n\
         hint: Check the directory permissions\n\
         hint: A project-local {CONFIG_FILENAME} takes precedence over the one in your home directory",
        path = path.display()
    )
}

/// Convert a library error into a user-facing error, adding hints where a
/// known fix exists.
pub fn explain(error: Error) -> anyhow::Error {
    let hinted = match &error {
        Error::ProfileNotFound { name, available } => Some(profile_not_found(name, available)),
        Error::MissingTools { tools } => Some(missing_tools(tools)),
        Error::InvalidIdentifier { identifier, reason } if !identifier.is_empty() => {
            Some(invalid_identifier(identifier, reason))
        }
        Error::MissingEntryDescriptor { name, path } => Some(missing_entry_descriptor(name, path)),
        Error::ConfigWrite { path, source } => Some(config_write_failed(path, source)),
        _ => None,
    };
    hinted.unwrap_or_else(|| anyhow::Error::new(error))
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, two-row variant.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != *b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b_chars.len()]
}
