// Version marker (README.toml) validation and persistence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document;
use crate::error::Result;

/// File name of the version marker inside the config root.
pub const MARKER_FILE: &str = "README.toml";

/// The `versions` table of the marker document. `created` records the
/// version that generated the current config set; `updated` records the
/// most recently acknowledged version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMarker {
    pub created: String,
    pub updated: String,
}

/// Outcome of loading a marker. Every structural deviation - absent file,
/// unreadable file, bad TOML, missing table, missing or mistyped field -
/// collapses to `Invalid`; downstream behavior (regenerate) is identical
/// for all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerState {
    Valid(VersionMarker),
    Invalid,
}

impl VersionMarker {
    /// True when the running application version matches neither recorded
    /// version.
    pub fn is_stale(&self, active: &str) -> bool {
        active != self.created && active != self.updated
    }
}

/// Load the marker at `path`.
pub fn load_marker(path: &Path) -> MarkerState {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            if path.exists() {
                log::warn!("Version marker {} is unreadable: {e}", path.display());
            }
            return MarkerState::Invalid;
        }
    };
    let table: toml::Table = match raw.parse() {
        Ok(table) => table,
        Err(e) => {
            log::warn!("Version marker {} is not valid TOML: {e}", path.display());
            return MarkerState::Invalid;
        }
    };
    match parse_versions(&table) {
        Some(marker) => MarkerState::Valid(marker),
        None => {
            log::warn!(
                "Version marker {} lacks a well-formed [versions] table",
                path.display()
            );
            MarkerState::Invalid
        }
    }
}

fn parse_versions(table: &toml::Table) -> Option<VersionMarker> {
    let versions = table.get("versions")?.as_table()?;
    let created = versions.get("created")?.as_str()?;
    let updated = versions.get("updated")?.as_str()?;
    Some(VersionMarker {
        created: created.to_string(),
        updated: updated.to_string(),
    })
}

/// Write a fresh marker with `created = updated = version` and the readme
/// text as a comment header. Callers must make this the last write of any
/// regeneration sequence.
pub fn write_marker(path: &Path, version: &str, readme: &str) -> Result<()> {
    let marker = VersionMarker {
        created: version.to_string(),
        updated: version.to_string(),
    };
    write(path, &marker, readme)
}

/// Rewrite the marker after a declined update: `created` keeps its original
/// value as a provenance record, `updated` becomes the active version so
/// the same version does not prompt again.
pub fn write_declined(
    path: &Path,
    marker: &VersionMarker,
    active: &str,
    readme: &str,
) -> Result<()> {
    let declined = VersionMarker {
        created: marker.created.clone(),
        updated: active.to_string(),
    };
    write(path, &declined, readme)
}

fn write(path: &Path, marker: &VersionMarker, readme: &str) -> Result<()> {
    let mut table = toml::Table::new();
    table.insert("versions".to_string(), toml::Value::try_from(marker)?);
    document::write_document(path, &table, Some(readme))
}
