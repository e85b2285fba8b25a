//! # Repository References
//!
//! Parsing and normalization of repository identifiers. An identifier is
//! either a bare `owner/name` pair or a full fetch URL (HTTPS or SSH-style).
//! Everything here is a pure string transform: no network or filesystem
//! access happens in this module.
//!
//! Bare identifiers are validated strictly by [`normalize`], so a malformed
//! name is rejected while planning instead of surfacing later as a failed
//! `git clone`.
//!
//! ```
//! use starlet_setup::reference::{normalize, short_name, Protocol};
//!
//! let url = normalize("masonlet/starlet-math", Protocol::Https).unwrap();
//! assert_eq!(url, "https://github.com/masonlet/starlet-math.git");
//! assert_eq!(short_name(&url), "starlet-math");
//! ```

use url::Url;

use crate::defaults::{DEFAULT_HOST, REPO_SUFFIX};
use crate::error::{Error, Result};

/// Transport used for generated fetch URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Https,
    Ssh,
}

impl Protocol {
    /// Maps the `--ssh` / `defaults.ssh` boolean onto a protocol.
    pub fn from_prefer_ssh(prefer_ssh: bool) -> Self {
        if prefer_ssh {
            Protocol::Ssh
        } else {
            Protocol::Https
        }
    }
}

/// Returns true if the identifier already looks like a fetch URL.
///
/// Recognized shapes are a URL scheme token followed by `://`
/// (`https://`, `ssh://`, `file://`, ...) and the scp-like SSH form
/// `user@host:path`.
pub fn is_url(identifier: &str) -> bool {
    has_scheme(identifier) || has_ssh_user_prefix(identifier)
}

fn has_scheme(identifier: &str) -> bool {
    let Some((scheme, _)) = identifier.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn has_ssh_user_prefix(identifier: &str) -> bool {
    let Some((prefix, _)) = identifier.split_once(':') else {
        return false;
    };
    if prefix.contains('/') || prefix.contains(char::is_whitespace) {
        return false;
    }
    matches!(prefix.split_once('@'), Some((user, host)) if !user.is_empty() && !host.is_empty())
}

/// Normalize an identifier into a fetch URL.
///
/// URL-shaped identifiers pass through unchanged whatever the protocol.
/// Bare identifiers must be exactly `owner/name`; they expand to
/// `https://github.com/owner/name.git` or `git@github.com:owner/name.git`.
pub fn normalize(identifier: &str, protocol: Protocol) -> Result<String> {
    if is_url(identifier) {
        return Ok(identifier.to_string());
    }

    let (owner, name) = split_owner_name(identifier)?;
    let url = match protocol {
        Protocol::Https => format!("https://{DEFAULT_HOST}/{owner}/{name}{REPO_SUFFIX}"),
        Protocol::Ssh => format!("git@{DEFAULT_HOST}:{owner}/{name}{REPO_SUFFIX}"),
    };
    Ok(url)
}

fn split_owner_name(identifier: &str) -> Result<(&str, &str)> {
    let invalid = |reason: &str| Error::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
    };

    if identifier.contains(char::is_whitespace) {
        return Err(invalid("identifiers cannot contain whitespace"));
    }
    if identifier.contains(':') || identifier.contains('@') {
        return Err(invalid("not a recognized URL and not of the form owner/name"));
    }

    let Some((owner, name)) = identifier.split_once('/') else {
        return Err(invalid("expected owner/name or a full URL"));
    };
    if name.contains('/') {
        return Err(invalid("expected exactly one '/' between owner and name"));
    }

    let name = name.strip_suffix(REPO_SUFFIX).unwrap_or(name);
    if owner.is_empty() || name.is_empty() {
        return Err(invalid("owner and name must both be non-empty"));
    }
    if is_relative_component(owner) || is_relative_component(name) {
        return Err(invalid("'.' and '..' are not repository names"));
    }
    Ok((owner, name))
}

fn is_relative_component(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Short name of a repository: the last path segment without `.git`.
///
/// Used as the clone directory and as the subproject name.
pub fn short_name(identifier: &str) -> String {
    let trimmed = identifier.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.strip_suffix(REPO_SUFFIX).unwrap_or(last).to_string()
}

/// Short name checked for use as a directory under a parent.
///
/// Rejects empty names and `.`/`..`, which would escape the parent.
pub fn directory_name(identifier: &str) -> Result<String> {
    let name = short_name(identifier);
    if name.is_empty() || is_relative_component(&name) {
        return Err(Error::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: format!("'{name}' cannot be used as a clone directory"),
        });
    }
    Ok(name)
}

/// Owner of a repository, if one can be derived.
///
/// For bare identifiers this is the text before the first `/`. For URLs it is
/// the path segment preceding the repository name.
pub fn owner(identifier: &str) -> Option<String> {
    if has_scheme(identifier) {
        let url = Url::parse(identifier).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        return parent_segment(&segments);
    }

    if has_ssh_user_prefix(identifier) {
        let (_, path) = identifier.split_once(':')?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        return parent_segment(&segments);
    }

    match identifier.split_once('/') {
        Some((owner, _)) if !owner.is_empty() => Some(owner.to_string()),
        _ => None,
    }
}

fn parent_segment(segments: &[&str]) -> Option<String> {
    let index = segments.len().checked_sub(2)?;
    Some(segments[index].to_string())
}

/// Qualify a bare repository name with an owner.
///
/// Identifiers that already contain a `/` or are URL-shaped are returned as-is.
pub fn qualify(identifier: &str, owner: &str) -> String {
    if identifier.contains('/') || is_url(identifier) {
        identifier.to_string()
    } else {
        format!("{owner}/{identifier}")
    }
}
