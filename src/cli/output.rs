//! Handles all user-facing output for the CLI.
//!
//! Every printer writes to a [`WriteColor`] so the interactive loop can be
//! exercised against an in-memory buffer as easily as against a terminal.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::candidate::CandidateState;
use crate::isolator::Status;
use crate::model::Model;

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints the units as a two-column table.
pub fn print_units<W: WriteColor>(out: &mut W, units: &[CandidateState]) -> io::Result<()> {
    if units.is_empty() {
        return writeln!(out, "No units found.");
    }
    for unit in units {
        if unit.active {
            set(out, Color::Green, false)?;
            write!(out, "  on   ")?;
        } else {
            set(out, Color::Red, false)?;
            write!(out, "  off  ")?;
        }
        out.reset()?;
        writeln!(out, "{}", unit.id)?;
    }
    Ok(())
}

/// Describes the round that is waiting for a verdict.
pub fn print_round<W: WriteColor>(out: &mut W, model: &Model) -> io::Result<()> {
    set(out, Color::Yellow, true)?;
    writeln!(
        out,
        "--- Round {}: testing {} of {} ({} still to go) ---",
        model.round,
        model.to_test.len(),
        model.originally_enabled.len(),
        model.remaining(),
    )?;
    out.reset()?;
    for id in &model.to_test {
        writeln!(out, "  {id}")?;
    }
    if !model.passed.is_empty() {
        set(out, Color::Cyan, false)?;
        writeln!(out, "  (+{} already cleared, still enabled)", model.passed.len())?;
        out.reset()?;
    }
    Ok(())
}

/// Announces how a session ended.
pub fn print_outcome<W: WriteColor>(out: &mut W, status: &Status, model: &Model) -> io::Result<()> {
    match status {
        Status::Testing { round } => {
            writeln!(out, "Stopped before a verdict for round {round}.")
        }
        Status::AllClear => {
            set(out, Color::Green, true)?;
            writeln!(out, "All units passed. None of them reproduces the problem.")?;
            out.reset()
        }
        Status::Isolated(culprit) => {
            set(out, Color::Red, true)?;
            writeln!(out, "Found it: {culprit}")?;
            out.reset()?;
            if !model.passed.is_empty() {
                writeln!(
                    out,
                    "It was tested alongside {} cleared unit(s); it may only misbehave in combination with them.",
                    model.passed.len()
                )?;
            }
            Ok(())
        }
        Status::Inconclusive => {
            set(out, Color::Magenta, true)?;
            writeln!(out, "The problem happens with nothing enabled; no unit is to blame.")?;
            out.reset()
        }
    }
}

/// Dumps the model as pretty JSON.
pub fn print_model<W: Write>(out: &mut W, model: &Model) -> io::Result<()> {
    let text = serde_json::to_string_pretty(model).map_err(io::Error::other)?;
    writeln!(out, "{text}")
}

pub fn print_notice<W: WriteColor>(out: &mut W, text: &str) -> io::Result<()> {
    set(out, Color::Cyan, false)?;
    writeln!(out, "{text}")?;
    out.reset()
}

pub fn print_problem<W: WriteColor>(out: &mut W, text: &str) -> io::Result<()> {
    set(out, Color::Red, false)?;
    writeln!(out, "{text}")?;
    out.reset()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn set<W: WriteColor>(out: &mut W, color: Color, bold: bool) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))
}
