use std::path::PathBuf;

use thiserror::Error;

use crate::types::FileFailure;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to load parser: {0}")]
    Parser(String),

    #[error("Invalid rename rules: {0}")]
    Rules(String),

    #[error("Input root not found or not a directory: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("No convertible files found under {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("No files could be converted ({} failed)", failures.len())]
    NothingConverted { failures: Vec<FileFailure> },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<zip::result::ZipError> for ConvertError {
    fn from(e: zip::result::ZipError) -> Self {
        ConvertError::Archive(e.to_string())
    }
}
