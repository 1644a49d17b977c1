use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("TOML Serialization Error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan Error: Cannot traverse root '{path}': {source}")]
    ScanTraversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Path: {0}")]
    InvalidPath(String),

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("No files selected")]
    EmptySelection,

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl From<globset::Error> for AppError {
    fn from(err: globset::Error) -> Self {
        AppError::Glob(format!("Globset error: {}", err))
    }
}
