//! Culprit REPL: the interactive oracle loop.
//!
//! Shows the round under test, asks whether the problem still happens, and
//! feeds the answer to the session until a culprit is found, every unit has
//! passed, or the user leaves.

use std::io::{BufRead, Write};

use termcolor::WriteColor;
use tracing::{debug, error, warn};

use crate::activator::Activator;
use crate::cli::output::{
    print_model, print_notice, print_outcome, print_problem, print_round,
};
use crate::errors::{CulpritError, Result};
use crate::isolator::Status;
use crate::model::Model;
use crate::session::Session;
use crate::verdict::Verdict;

const PROMPT: &str = "Does the problem still happen? [y]es / [n]o (:help) > ";

const HELP: &str = "\
Answers:
  y, yes, fail, bad     the problem still happens
  n, no, pass, good     the problem is gone
Commands:
  :status               print the session state as JSON
  :undo                 step back to the previous round
  :restore              put every unit back as it was and quit
  :quit                 stop here, leaving units as they are";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Verdict(Verdict),
    Status,
    Undo,
    Restore,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parses a line; the leading `:` on commands is optional.
    pub fn parse(line: &str) -> Result<Self> {
        let word = line.trim();
        match word.strip_prefix(':').unwrap_or(word).to_ascii_lowercase().as_str() {
            "status" | "s" => Ok(ReplCommand::Status),
            "undo" | "u" => Ok(ReplCommand::Undo),
            "restore" | "r" => Ok(ReplCommand::Restore),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
            _ => word.parse().map(ReplCommand::Verdict),
        }
    }
}

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BisectOutcome {
    pub status: Status,
    pub model: Model,
    pub restored: bool,
}

/// Runs a whole bisection, reading answers from `input` and writing rounds
/// and results to `out`.
///
/// With `restore_on_exit`, the units are put back even when the loop stops
/// on an error; that error is still returned.
pub fn run_bisect<A, R, W>(
    session: &mut Session<A>,
    input: R,
    out: &mut W,
    restore_on_exit: bool,
) -> Result<BisectOutcome>
where
    A: Activator,
    R: BufRead,
    W: WriteColor,
{
    let first = session.start()?;
    let mut state = LoopState {
        status: first.status,
        model: first.model,
        history: Vec::new(),
        restored: false,
    };

    let looped = drive_loop(session, input, out, &mut state)
        .and_then(|()| print_outcome(out, &state.status, &state.model).map_err(Into::into));

    if restore_on_exit && !state.restored {
        match session.restore(&state.model) {
            Ok(()) => {
                state.restored = true;
                if looped.is_ok() {
                    print_notice(out, "Restored every unit to its original state.")?;
                }
            }
            Err(restore_err) if looped.is_err() => {
                error!(error = %restore_err, "could not restore units after an error");
            }
            Err(restore_err) => return Err(restore_err),
        }
    } else if !state.restored && !state.status.is_terminal() {
        warn!(round = state.model.round, "leaving units in their mid-session state");
    }

    looped?;
    Ok(BisectOutcome {
        status: state.status,
        model: state.model,
        restored: state.restored,
    })
}

/// Everything the loop updates, kept outside it so the latest model is
/// still at hand when the loop fails.
struct LoopState {
    status: Status,
    model: Model,
    history: Vec<Model>,
    restored: bool,
}

fn drive_loop<A, R, W>(
    session: &mut Session<A>,
    mut input: R,
    out: &mut W,
    state: &mut LoopState,
) -> Result<()>
where
    A: Activator,
    R: BufRead,
    W: WriteColor,
{
    if state.model.originally_enabled.is_empty() {
        print_notice(out, "No units are enabled; there is nothing to bisect.")?;
    }

    let mut show_round = true;
    while !state.status.is_terminal() {
        if show_round {
            print_round(out, &state.model)?;
            show_round = false;
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            debug!("input closed");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(e @ CulpritError::UnknownVerdict { .. }) => {
                print_problem(out, &format!("{e}. Type :help for the accepted answers."))?;
                continue;
            }
            Err(e) => return Err(e),
        };

        match command {
            ReplCommand::Verdict(verdict) => {
                let next = session.report(&state.model, verdict)?;
                state
                    .history
                    .push(std::mem::replace(&mut state.model, next.model));
                state.status = next.status;
                show_round = true;
            }
            ReplCommand::Undo => match state.history.pop() {
                Some(previous) => {
                    session.realign(&previous)?;
                    state.status = Status::Testing {
                        round: previous.round,
                    };
                    state.model = previous;
                    show_round = true;
                }
                None => print_problem(out, "Nothing to undo; this is the first round.")?,
            },
            ReplCommand::Status => print_model(out, &state.model)?,
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Restore => {
                session.restore(&state.model)?;
                state.restored = true;
                print_notice(out, "Restored every unit to its original state.")?;
                break;
            }
            ReplCommand::Quit => break,
        }
    }
    Ok(())
}
