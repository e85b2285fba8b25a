//! # Aggregate CMakeLists.txt Generation
//!
//! A batch directory holds one clone per member plus a generated root
//! `CMakeLists.txt` that pulls every member in with `add_subdirectory`.
//!
//! Rules for the generated file:
//! - A member without its own `CMakeLists.txt` is skipped with a CMake
//!   `WARNING`; the rest of the aggregate still configures.
//! - The entry is guarded by a `FATAL_ERROR` check, since an aggregate
//!   without a usable entry point is useless.
//! - The entry becomes `VS_STARTUP_PROJECT`, with hyphens replaced by
//!   underscores to match the target name the entry project declares.
//!
//! The file is regenerated in full on every run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::DESCRIPTOR_FILENAME;
use crate::error::Result;

const MINIMUM_CMAKE_VERSION: &str = "3.16";

/// A rendered aggregate descriptor and what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateDescriptor {
    pub text: String,
    /// Members declared as subprojects, in order (entry included when present).
    pub included: Vec<String>,
    /// Members skipped because their `CMakeLists.txt` is missing.
    pub skipped: Vec<String>,
    /// Whether the entry's own `CMakeLists.txt` was found.
    pub entry_present: bool,
}

/// CMake target name for a repository name.
pub fn target_name(repo_name: &str) -> String {
    repo_name.replace('-', "_")
}

/// Project name derived from the batch directory name.
fn project_name(dir_name: &str) -> String {
    let sanitized: String = dir_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "starlet_batch".to_string()
    } else {
        sanitized
    }
}

/// Render the descriptor text.
///
/// `has_descriptor` reports whether a member directory contains its own
/// `CMakeLists.txt`. The entry is always emitted last, after its guard, even
/// when `members` lists it earlier.
pub fn render<F>(project: &str, entry: &str, members: &[String], has_descriptor: F) -> AggregateDescriptor
where
    F: Fn(&str) -> bool,
{
    let mut text = String::new();
    text.push_str("# Generated by starlet-setup. Regenerated on every batch run; do not edit.\n");
    text.push_str(&format!("cmake_minimum_required(VERSION {})\n", MINIMUM_CMAKE_VERSION));
    text.push_str(&format!("project({})\n\n", project_name(project)));

    let mut included = Vec::new();
    let mut skipped = Vec::new();

    for member in members.iter().filter(|m| m.as_str() != entry) {
        if has_descriptor(member) {
            text.push_str(&format!("add_subdirectory({})\n", member));
            included.push(member.clone());
        } else {
            text.push_str(&format!(
                "message(WARNING \"starlet-setup: skipping {} (no {} found)\")\n",
                member, DESCRIPTOR_FILENAME
            ));
            skipped.push(member.clone());
        }
    }

    let entry_present = has_descriptor(entry);
    text.push('\n');
    text.push_str(&format!(
        "if(NOT EXISTS \"${{CMAKE_CURRENT_SOURCE_DIR}}/{}/{}\")\n",
        entry, DESCRIPTOR_FILENAME
    ));
    text.push_str(&format!(
        "  message(FATAL_ERROR \"starlet-setup: entry repository '{}' has no {}\")\n",
        entry, DESCRIPTOR_FILENAME
    ));
    text.push_str("endif()\n");
    text.push_str(&format!("add_subdirectory({})\n", entry));
    if entry_present {
        included.push(entry.to_string());
    }

    text.push_str(&format!(
        "\nset_property(DIRECTORY ${{CMAKE_CURRENT_SOURCE_DIR}} PROPERTY VS_STARTUP_PROJECT {})\n",
        target_name(entry)
    ));

    AggregateDescriptor {
        text,
        included,
        skipped,
        entry_present,
    }
}

/// Render the descriptor for `target_dir`, probing each member directory.
pub fn generate(target_dir: &Path, entry: &str, members: &[String]) -> AggregateDescriptor {
    let project = target_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    render(&project, entry, members, |member| {
        let path = target_dir.join(member).join(DESCRIPTOR_FILENAME);
        let present = path.is_file();
        if !present {
            log::debug!("No descriptor at {}", path.display());
        }
        present
    })
}

/// Write the descriptor to `<target_dir>/CMakeLists.txt`, replacing any
/// previous one.
pub fn write(target_dir: &Path, descriptor: &AggregateDescriptor) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)?;
    let path = target_dir.join(DESCRIPTOR_FILENAME);
    fs::write(&path, &descriptor.text)?;
    Ok(path)
}
