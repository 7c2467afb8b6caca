// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Shell - Commands
//
// One input line is split shell-style and parsed into a Command.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fishing-log",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Log a catch into the current storage
    Add {
        /// Species name (quote names with spaces)
        name: String,
        /// Weight in grams
        #[arg(short, long, allow_hyphen_values = true)]
        weight: String,
        /// common, uncommon, rare or trophy
        #[arg(short, long)]
        rarity: Option<String>,
    },
    /// Show the current and permanent storages
    #[command(alias = "ls")]
    List,
    /// List all temporary storages
    Storages,
    /// Create a temporary storage and switch to it
    Create {
        name: String,
        /// Capacity in kg (default 50)
        #[arg(short, long, allow_hyphen_values = true)]
        limit: Option<String>,
    },
    /// Rename or re-limit the current storage
    Edit {
        #[arg(short, long)]
        name: Option<String>,
        /// Capacity in kg
        #[arg(short, long, allow_hyphen_values = true)]
        limit: Option<String>,
    },
    /// Delete the current storage and its fish
    Delete {
        /// Skip the confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Make another storage current
    Switch { name: String },
    /// Remove one fish from the current storage by id prefix
    #[command(alias = "rm")]
    Remove { id: String },
    /// Move all fish of the current storage to the permanent storage
    Transfer {
        #[arg(short, long)]
        yes: bool,
    },
    /// Set the permanent storage capacity in kg
    PermanentLimit {
        #[arg(allow_hyphen_values = true)]
        limit: String,
    },
    /// Sell everything in the permanent storage
    Sell {
        #[arg(short, long)]
        yes: bool,
    },
    /// Show catch statistics
    Stats,
    /// Browse the fish reference
    Wiki { term: Option<String> },
    /// Show or change settings
    Config {
        /// Fill percentage that triggers a warning
        #[arg(long)]
        warn_threshold: Option<f64>,
        /// Data directory, used from the next launch
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Parse one input line. Blank lines give `Ok(None)`; parse failures and
/// help requests give the text to show.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let words = shlex::split(line).ok_or_else(|| "Unbalanced quotes".to_string())?;
    if words.is_empty() {
        return Ok(None);
    }

    Line::try_parse_from(words)
        .map(|line| Some(line.command))
        .map_err(|e| e.render().to_string())
}

/// Lenient number parsing for limits; accepts a decimal comma
pub fn parse_number(input: &str) -> Option<f64> {
    input.trim().replace(',', ".").parse().ok()
}
