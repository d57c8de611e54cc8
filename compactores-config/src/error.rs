use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Expected a directory, but found another object at {}", path.display())]
    StructuralConflict { path: PathBuf },

    #[error("Failed to export default configuration: {0}")]
    Export(String),

    #[error("Failed to load config document {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("Config semantic validation failed: {0}")]
    SemanticLoadFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
