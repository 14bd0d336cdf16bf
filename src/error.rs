use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading/saving configuration and presets, and from logging setup.
/// The rendering core itself never fails.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid color '{0}' (expected rgba(r, g, b, a), rgb(r, g, b) or #rrggbb)")]
    Color(String),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Failed to set up logging: {0}")]
    Log(String),
}

impl FieldError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FieldError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FieldError>;
