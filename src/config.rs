//! Runtime settings.
//!
//! Each setting is taken from the command line when given, then from the
//! environment, then from a built-in default.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use termcolor::ColorChoice;

use crate::errors::{CulpritError, Result};

pub const MANIFEST_ENV: &str = "CULPRIT_MANIFEST";
pub const COLOR_ENV: &str = "CULPRIT_COLOR";
pub const DEFAULT_MANIFEST: &str = "culprit.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = CulpritError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(CulpritError::InvalidSetting {
                setting: COLOR_ENV,
                value: value.to_string(),
            }),
        }
    }
}

impl ColorMode {
    /// `auto` only colors when stdout is a terminal.
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub manifest: PathBuf,
    pub color: ColorMode,
    pub verbosity: u8,
}

impl Settings {
    /// Fills in whatever the command line left out.
    pub fn resolve(
        manifest: Option<PathBuf>,
        color: Option<ColorMode>,
        verbosity: u8,
    ) -> Result<Self> {
        Self::resolve_with(manifest, color, verbosity, |key| env::var(key).ok())
    }

    /// Like [`Settings::resolve`], reading the environment through `lookup`.
    pub fn resolve_with(
        manifest: Option<PathBuf>,
        color: Option<ColorMode>,
        verbosity: u8,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let manifest = manifest
            .or_else(|| lookup(MANIFEST_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
        let color = match color {
            Some(color) => color,
            None => match lookup(COLOR_ENV).filter(|v| !v.is_empty()) {
                Some(value) => value.parse()?,
                None => ColorMode::default(),
            },
        };
        Ok(Self {
            manifest,
            color,
            verbosity,
        })
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
