//! # Init-Config Command Implementation
//!
//! Writes a starter `.starlet-setup.json` to the current directory: every
//! option default spelled out, plus a `default` profile holding the built-in
//! library set.

use std::io::IsTerminal;

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

use starlet_setup::config::{self, Config, ConfigLocations};
use starlet_setup::defaults::CONFIG_FILENAME;
use starlet_setup::output::{self, emoji, OutputConfig};
use starlet_setup::suggestions;

/// Write a starter .starlet-setup.json in the current directory
#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Overwrite an existing configuration file without asking
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `init-config` command.
pub fn execute(args: InitConfigArgs, out: &OutputConfig) -> Result<()> {
    let locations = ConfigLocations::discover();
    let path = locations.project.clone();

    if path.exists() && !args.force {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!(
                "Configuration file '{}' already exists. Use --force to overwrite.",
                CONFIG_FILENAME
            );
        }
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} already exists. Overwrite it?", CONFIG_FILENAME))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Aborted. Existing configuration left unchanged.");
            return Ok(());
        }
    }

    config::write_atomic(&path, &Config::starter()).map_err(suggestions::explain)?;
    println!("{}", output::success(out, &format!("Created {}", CONFIG_FILENAME)));

    println!("\nConfiguration is read from the first usable file of:");
    for (index, candidate) in locations.search_order().iter().enumerate() {
        println!("  {}. {}", index + 1, candidate.display());
    }
    println!(
        "{} Edit the 'default' profile, then run `starlet-setup <owner>/<repo> --profile`",
        emoji(out, "💡", "[TIP]")
    );
    Ok(())
}
