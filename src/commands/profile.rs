//! # Profile Command Implementation
//!
//! `profile list|add|remove`: manage the named repository lists stored in
//! the `profiles` section of `.starlet-setup.json`.
//!
//! Changes are written back to the configuration file the profiles were
//! loaded from, or to the standard write location when none exists yet.

use std::io::IsTerminal;

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

use starlet_setup::config::{self, ConfigLocations};
use starlet_setup::output::{self, emoji, OutputConfig};
use starlet_setup::profiles::ProfileStore;
use starlet_setup::suggestions;

/// Manage saved repository profiles
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// List saved profiles and their repositories
    List,

    /// Save a profile (replaces an existing one after confirmation)
    Add {
        /// Profile name
        name: String,

        /// Repositories in the profile
        #[arg(value_name = "REPO", required = true, num_args = 1..)]
        repos: Vec<String>,

        /// Overwrite an existing profile without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a saved profile
    Remove {
        /// Profile name
        name: String,
    },
}

/// Execute the `profile` command.
pub fn execute(args: ProfileArgs, out: &OutputConfig) -> Result<()> {
    let mut store = open_store(out);

    match args.action {
        ProfileAction::List => list(&store, out),
        ProfileAction::Add { name, repos, force } => add(&mut store, &name, repos, force, out),
        ProfileAction::Remove { name } => remove(&mut store, &name, out),
    }
}

fn open_store(out: &OutputConfig) -> ProfileStore {
    let locations = ConfigLocations::discover();
    let loaded = config::load(&locations);
    for warning in &loaded.warnings {
        eprintln!("{}", output::warning(out, &warning.to_string()));
    }
    let path = loaded.path.unwrap_or_else(|| locations.write_target());
    ProfileStore::from_config(loaded.config, path)
}

fn list(store: &ProfileStore, out: &OutputConfig) -> Result<()> {
    if store.is_empty() {
        println!("No profiles saved.");
        println!(
            "{} Add one with `starlet-setup profile add <NAME> <REPO>...`",
            emoji(out, "💡", "[TIP]")
        );
        return Ok(());
    }

    println!("{} Profiles ({}):", emoji(out, "📋", "[LIST]"), store.path().display());
    for (name, repos) in store.list() {
        println!("  {}:", name);
        for repo in repos {
            println!("    - {}", repo);
        }
    }
    Ok(())
}

fn add(store: &mut ProfileStore, name: &str, repos: Vec<String>, force: bool, out: &OutputConfig) -> Result<()> {
    if store.contains(name) && !force {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!(
                "Profile '{}' already exists\n\n\
                 hint: Use --force to overwrite it",
                name
            );
        }
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Profile '{}' already exists. Overwrite it?", name))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Aborted. Profile '{}' left unchanged.", name);
            return Ok(());
        }
    }

    let count = repos.len();
    let replaced = store.add(name, repos).map_err(suggestions::explain)?;
    store.save().map_err(suggestions::explain)?;

    let verb = if replaced.is_some() { "Updated" } else { "Saved" };
    println!(
        "{}",
        output::success(
            out,
            &format!(
                "{} profile '{}' with {} repositories in {}",
                verb,
                name,
                count,
                store.path().display()
            )
        )
    );
    Ok(())
}

fn remove(store: &mut ProfileStore, name: &str, out: &OutputConfig) -> Result<()> {
    if store.remove(name).is_none() {
        println!("Profile '{}' not found; nothing to remove.", name);
        if !store.is_empty() {
            println!("Available profiles: {}", store.names().join(", "));
        }
        return Ok(());
    }

    store.save().map_err(suggestions::explain)?;
    println!("{}", output::success(out, &format!("Removed profile '{}'", name)));
    Ok(())
}
