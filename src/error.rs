//! Error types for the script runner, the execution recorder and the data sink.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by script logic.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("{reason}")]
    InvalidInput { reason: String },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ScriptError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<SinkError> for ScriptError {
    fn from(err: SinkError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

/// Failures while writing or reading the execution log.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open execution log {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write execution log {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read execution log {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize execution record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed record at {path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

/// Failures while writing result artifacts to the data directory.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("invalid output name {name:?}: must be a plain file name")]
    InvalidName { name: String },

    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write output {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}
