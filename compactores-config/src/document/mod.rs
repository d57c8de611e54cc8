// Document I/O - read/write TOML config documents

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// File extension shared by every config document.
pub const FILE_EXTENSION: &str = "toml";

/// A loaded config document: a filename-derived id plus its opaque payload.
/// The payload is owned by this adapter; callers downstream interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    pub id: String,
    pub path: PathBuf,
    pub data: toml::Table,
}

/// Derive the stable document id from a file path (extension stripped).
pub fn document_id(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Whether a path carries the config file extension, matched
/// case-insensitively.
pub fn has_config_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(FILE_EXTENSION))
}

/// Read and parse a single config document.
pub fn read_document(path: &Path) -> Result<ConfigDocument> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let data: toml::Table = raw.parse().map_err(|e: toml::de::Error| ConfigError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let id = document_id(path).ok_or_else(|| ConfigError::Load {
        path: path.to_path_buf(),
        message: "file name has no stem".to_string(),
    })?;

    Ok(ConfigDocument {
        id,
        path: path.to_path_buf(),
        data,
    })
}

/// Serialize a document to disk, optionally preceded by a `#`-commented
/// header block.
pub fn write_document(path: &Path, data: &toml::Table, header: Option<&str>) -> Result<()> {
    let body = toml::to_string_pretty(data)?;
    let mut out = String::new();
    if let Some(header) = header {
        for line in header.lines() {
            if line.is_empty() {
                out.push_str("#\n");
            } else {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out.push_str(&body);
    fs::write(path, out)?;
    Ok(())
}
