//! Culprit error handling.
//!
//! The isolation core is total and never fails. Everything here comes from
//! the edges: reading and writing a manifest, or making sense of what the
//! user typed.

use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

/// Type alias for results that can fail with a [`CulpritError`].
pub type Result<T> = std::result::Result<T, CulpritError>;

#[derive(Error, Diagnostic, Debug)]
pub enum CulpritError {
    #[error("could not read manifest '{}'", .path.display())]
    #[diagnostic(
        code(culprit::manifest::read),
        help("pass --manifest <PATH> or set CULPRIT_MANIFEST to point at your units file")
    )]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write manifest '{}'", .path.display())]
    #[diagnostic(code(culprit::manifest::write))]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest is not valid {format}: {message}")]
    #[diagnostic(
        code(culprit::manifest::parse),
        help("expected a top-level `units` list of {{ name, enabled }} entries")
    )]
    ManifestParse {
        format: &'static str,
        message: String,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("could not serialize manifest: {message}")]
    #[diagnostic(code(culprit::manifest::serialize))]
    ManifestSerialize { message: String },

    #[error("unit '{name}' appears more than once in the manifest")]
    #[diagnostic(
        code(culprit::manifest::duplicate),
        help("unit names identify units and must be unique")
    )]
    DuplicateUnit { name: String },

    #[error("unrecognised verdict '{input}'")]
    #[diagnostic(
        code(culprit::verdict),
        help("answer `pass` if the problem is gone, `fail` if it still happens")
    )]
    UnknownVerdict { input: String },

    #[error("invalid value '{value}' for {setting}")]
    #[diagnostic(code(culprit::config))]
    InvalidSetting { setting: &'static str, value: String },

    #[error("I/O error on the terminal")]
    #[diagnostic(code(culprit::io))]
    Io(#[from] std::io::Error),
}

/// Renders an error with its diagnostic decorations on stderr.
pub fn print_error(error: CulpritError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}
