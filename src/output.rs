//! # Output Configuration
//!
//! Controls how progress lines look: emoji and color when the terminal
//! supports them, plain bracketed tags otherwise.
//!
//! The following environment variables and flags are respected:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ```rust,ignore
//! use starlet_setup::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Cloning...", emoji(&config, "📥", "[CLONE]"));
//! ```

use std::env;

use console::style;

use crate::orchestrator::Progress;
use crate::repository::FetchOutcome;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` overrides `NO_COLOR`; `--color=auto` (or anything
    /// unrecognized) detects support from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// A warning line, yellow when colors are enabled.
pub fn warning(config: &OutputConfig, message: &str) -> String {
    format!(
        "{} {}",
        style(emoji(config, "⚠️ ", "[WARN]"))
            .yellow()
            .force_styling(config.use_color),
        style(message).yellow().force_styling(config.use_color)
    )
}

/// A success line, green when colors are enabled.
pub fn success(config: &OutputConfig, message: &str) -> String {
    format!(
        "{} {}",
        emoji(config, "✅", "[OK]"),
        style(message).green().force_styling(config.use_color)
    )
}

/// Render a progress event as a single status line.
pub fn progress_line(config: &OutputConfig, progress: &Progress) -> String {
    match progress {
        Progress::Fetching { name, url } => {
            format!("{} Fetching {} from {}", emoji(config, "📥", "[FETCH]"), name, url)
        }
        Progress::Fetched { name, outcome } => {
            let verb = match outcome {
                FetchOutcome::Cloned => "Cloned",
                FetchOutcome::Updated => "Updated",
                FetchOutcome::Kept => "Kept existing",
            };
            format!("{} {} {}", emoji(config, "✅", "[OK]"), verb, name)
        }
        Progress::DescriptorWritten { path } => format!(
            "{} Wrote {}",
            emoji(config, "📝", "[WRITE]"),
            path.display()
        ),
        Progress::MemberSkipped { name } => warning(
            config,
            &format!("Skipping {} (no CMakeLists.txt found)", name),
        ),
        Progress::Building { source_dir } => format!(
            "{} Building {}",
            emoji(config, "🔨", "[BUILD]"),
            source_dir.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper() {
        assert_eq!(emoji(&OutputConfig::with_color(), "📥", "[FETCH]"), "📥");
        assert_eq!(emoji(&OutputConfig::without_color(), "📥", "[FETCH]"), "[FETCH]");
    }

    #[test]
    fn test_plain_lines_have_no_escape_codes() {
        let config = OutputConfig::without_color();
        assert_eq!(
            warning(&config, "Skipping starlet-logger"),
            "[WARN] Skipping starlet-logger"
        );
        assert_eq!(success(&config, "Done"), "[OK] Done");
    }

    #[test]
    fn test_colored_warning_is_styled() {
        let line = warning(&OutputConfig::with_color(), "careful");
        assert!(line.contains("\u{1b}["));
        assert!(line.contains("careful"));
    }

    #[test]
    fn test_progress_lines_plain() {
        let config = OutputConfig::without_color();
        assert_eq!(
            progress_line(
                &config,
                &Progress::Fetching {
                    name: "starlet-math".to_string(),
                    url: "https://github.com/masonlet/starlet-math.git".to_string(),
                }
            ),
            "[FETCH] Fetching starlet-math from https://github.com/masonlet/starlet-math.git"
        );
        assert_eq!(
            progress_line(
                &config,
                &Progress::Fetched {
                    name: "app".to_string(),
                    outcome: FetchOutcome::Updated,
                }
            ),
            "[OK] Updated app"
        );
        assert_eq!(
            progress_line(
                &config,
                &Progress::Building {
                    source_dir: PathBuf::from("build-batch"),
                }
            ),
            "[BUILD] Building build-batch"
        );
    }
}
