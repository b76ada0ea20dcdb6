//! Errors raised outside the core pipeline
//!
//! Tokenizing, parsing and emitting never fail. Everything here comes from
//! the filesystem and configuration side of the tool.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmaError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("source directory not found: {0}")]
    MissingSourceDir(PathBuf),

    #[error("project directory already exists: {0}")]
    ProjectExists(PathBuf),

    #[error("invalid project name {0:?}: use letters, digits, '-' or '_'")]
    InvalidProjectName(String),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl EmaError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EmaError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EmaError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = EmaError> = std::result::Result<T, E>;
