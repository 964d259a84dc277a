//! The Culprit Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io;
use std::process;

use clap::Parser;
use termcolor::StandardStream;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::activator::{Activator, ManifestActivator};
use crate::cli::args::{Command, CulpritArgs};
use crate::config::Settings;
use crate::errors::{print_error, Result};
use crate::repl::run_bisect;
use crate::session::Session;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = CulpritArgs::parse();

    let result = Settings::resolve(args.manifest.clone(), args.color, args.verbose)
        .and_then(|settings| {
            init_tracing(&settings);
            dispatch(args.command, &settings)
        });

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

fn dispatch(command: Command, settings: &Settings) -> Result<()> {
    let activator = ManifestActivator::open(&settings.manifest)?;
    let mut stdout = StandardStream::stdout(settings.color.choice());
    debug!(?command, manifest = %settings.manifest.display(), "dispatching");

    match command {
        Command::List { json } => handle_list(&activator, &mut stdout, json),
        Command::EnableAll => {
            let mut session = Session::new(activator);
            session.fully_enable()?;
            let count = session.activator().list_candidates().len();
            output::print_notice(&mut stdout, &format!("Enabled {count} unit(s)."))?;
            Ok(())
        }
        Command::DisableAll => {
            let mut session = Session::new(activator);
            session.fully_disable()?;
            let count = session.activator().list_candidates().len();
            output::print_notice(&mut stdout, &format!("Disabled {count} unit(s)."))?;
            Ok(())
        }
        Command::Bisect { restore_on_exit } => {
            let mut session = Session::new(activator);
            let stdin = io::stdin();
            run_bisect(&mut session, stdin.lock(), &mut stdout, restore_on_exit)?;
            Ok(())
        }
    }
}

fn handle_list(activator: &ManifestActivator, stdout: &mut StandardStream, json: bool) -> Result<()> {
    let units = activator.list_candidates();
    if json {
        let text = serde_json::to_string_pretty(&units).map_err(io::Error::other)?;
        println!("{text}");
        return Ok(());
    }
    output::print_units(stdout, &units)?;
    Ok(())
}

/// Logs go to stderr so they never interleave with the prompt on stdout.
fn init_tracing(settings: &Settings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_log_filter()));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(env_filter)
        .try_init();
}
