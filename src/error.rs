use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::level::ParseLevelError;

/// Reasons a logger could not be constructed.
///
/// These are the only failures a caller ever sees. Once a logger exists,
/// I/O problems are reported through `tracing` and absorbed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),

    #[error("unsupported template {0:?}, expected \"simple\" or \"standard\"")]
    UnsupportedTemplate(String),

    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
