//! Defines the command-line arguments and subcommands for the Culprit CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ColorMode;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "culprit",
    version,
    about = "Find the extension, plugin, or flag behind a problem by bisecting which ones are switched on."
)]
pub struct CulpritArgs {
    /// Manifest listing the units and whether each is enabled.
    /// Falls back to $CULPRIT_MANIFEST, then ./culprit.yaml.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// When to color output. Falls back to $CULPRIT_COLOR, then auto.
    #[arg(long, global = true, value_enum, value_name = "WHEN")]
    pub color: Option<ColorMode>,

    /// Log more (-v for rounds, -vv for every toggle). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every unit and whether it is enabled.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Enable every unit.
    EnableAll,
    /// Disable every unit.
    DisableAll,
    /// Interactively bisect the enabled units until the culprit is found.
    Bisect {
        /// Put every unit back the way it was when the session ends.
        #[arg(long)]
        restore_on_exit: bool,
    },
}
