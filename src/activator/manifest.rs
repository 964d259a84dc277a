//! A file-backed activator.
//!
//! The manifest lists units with an `enabled` flag. Whatever actually loads
//! the units (a plugin host, a browser profile script, a feature-flag file
//! consumer) reads the same file, so toggling a flag here and restarting the
//! host is enough to run a round.
//!
//! ```yaml
//! units:
//!   - name: Dark Reader
//!     enabled: true
//!   - name: Tab Suspender
//!     enabled: false
//!     homepage: https://example.org
//! ```
//!
//! A flush re-renders the whole file from the parsed manifest. Unknown keys
//! such as `homepage` above are kept, but comments, key order within the
//! top level, quoting and other formatting of a hand-written file are not.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activator::Activator;
use crate::candidate::{Candidate, CandidateState};
use crate::errors::{CulpritError, Result};

// ============================================================================
// MANIFEST SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub units: Vec<UnitEntry>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ManifestFormat::Json,
            _ => ManifestFormat::Yaml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ManifestFormat::Yaml => "YAML",
            ManifestFormat::Json => "JSON",
        }
    }
}

impl Manifest {
    /// Parses manifest text. `origin` names the source in diagnostics.
    pub fn parse(source: &str, format: ManifestFormat, origin: &str) -> Result<Self> {
        let parsed = match format {
            ManifestFormat::Yaml => serde_yaml::from_str::<Manifest>(source).map_err(|e| {
                let offset = e.location().map(|loc| loc.index()).unwrap_or(0);
                (e.to_string(), offset)
            }),
            ManifestFormat::Json => serde_json::from_str::<Manifest>(source).map_err(|e| {
                let offset = line_col_to_offset(source, e.line(), e.column());
                (e.to_string(), offset)
            }),
        };

        let manifest = parsed.map_err(|(message, offset)| CulpritError::ManifestParse {
            format: format.name(),
            message,
            src: Arc::new(NamedSource::new(origin, source.to_string())),
            span: label_span(source, offset),
        })?;
        manifest.check_unique()?;
        Ok(manifest)
    }

    pub fn render(&self, format: ManifestFormat) -> Result<String> {
        match format {
            ManifestFormat::Yaml => serde_yaml::to_string(self).map_err(|e| {
                CulpritError::ManifestSerialize {
                    message: e.to_string(),
                }
            }),
            ManifestFormat::Json => serde_json::to_string_pretty(self)
                .map(|mut text| {
                    text.push('\n');
                    text
                })
                .map_err(|e| CulpritError::ManifestSerialize {
                    message: e.to_string(),
                }),
        }
    }

    fn check_unique(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for unit in &self.units {
            if !seen.insert(unit.name.as_str()) {
                return Err(CulpritError::DuplicateUnit {
                    name: unit.name.clone(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// ACTIVATOR
// ============================================================================

/// Toggles units by rewriting a manifest file.
///
/// Changes are held in memory until [`Activator::flush`], which rewrites the
/// file only if something actually changed.
#[derive(Debug)]
pub struct ManifestActivator {
    path: PathBuf,
    format: ManifestFormat,
    manifest: Manifest,
    dirty: bool,
}

impl ManifestActivator {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ManifestFormat::from_path(&path);
        let source = fs::read_to_string(&path).map_err(|source| CulpritError::ManifestRead {
            path: path.clone(),
            source,
        })?;
        let manifest = Manifest::parse(&source, format, &path.display().to_string())?;
        debug!(path = %path.display(), units = manifest.units.len(), "loaded manifest");
        Ok(Self {
            path,
            format,
            manifest,
            dirty: false,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn set(&mut self, id: &Candidate, enabled: bool) {
        if let Some(unit) = self
            .manifest
            .units
            .iter_mut()
            .find(|unit| unit.name == id.as_str() && unit.enabled != enabled)
        {
            unit.enabled = enabled;
            self.dirty = true;
        }
    }
}

impl Activator for ManifestActivator {
    fn list_candidates(&self) -> Vec<CandidateState> {
        self.manifest
            .units
            .iter()
            .map(|unit| CandidateState::new(unit.name.as_str(), unit.enabled))
            .collect()
    }

    fn activate(&mut self, id: &Candidate) {
        self.set(id, true);
    }

    fn deactivate(&mut self, id: &Candidate) {
        self.set(id, false);
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let text = self.manifest.render(self.format)?;
        fs::write(&self.path, text).map_err(|source| CulpritError::ManifestWrite {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        info!(path = %self.path.display(), "manifest updated");
        Ok(())
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// Converts a one-based line/column pair into a byte offset.
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

fn label_span(source: &str, offset: usize) -> SourceSpan {
    let offset = offset.min(source.len());
    let len = usize::from(offset < source.len());
    (offset, len).into()
}
