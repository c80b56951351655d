//! # growth
//!
//! Command-line host for the mentorship services: assign mentors, feed edit
//! events and query active mentees against a local `SQLite` database.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use growth_mentorship::MentorshipServices;
use growth_settings::{load_settings, load_settings_from_path};

use crate::commands::Command;

/// Mentorship bookkeeping for newcomer onboarding.
#[derive(Parser, Debug)]
#[command(name = "growth", version, about)]
struct Cli {
    /// Database file (overrides settings).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Settings file (default: `~/.growth/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => load_settings_from_path(path),
        None => load_settings(),
    }
    .context("failed to load settings")?;
    if let Some(db) = &cli.db {
        settings.database.path = Some(db.to_string_lossy().into_owned());
    }

    if settings.logging.json {
        growth_core::logging::init_json_subscriber(&settings.logging.level);
    } else {
        growth_core::logging::init_subscriber(&settings.logging.level);
    }

    let services = MentorshipServices::open(&settings).context("failed to open database")?;
    let output = commands::run(&services, cli.command)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else {
        println!("{}", output.text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "growth",
            "is-mentee",
            "--user",
            "7",
            "--db",
            "/tmp/x.db",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }
}
