use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds surfaced by the inspection engine.
///
/// Bulk operations never return these for a single element; they skip or
/// record the element and keep going. Single-target operations return them
/// as-is so the caller can tell a vanished pid from a refused one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("No process found with PID: {0}")]
    NotFound(u32),

    #[error("No process found with name containing: {0}")]
    NoMatch(String),

    #[error("Permission denied for PID {0}")]
    PermissionDenied(u32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to read process table: {0}")]
    ProcTable(String),
}

impl ProcessError {
    /// True for the "target is gone" family, used by the monitor loop to end cleanly.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProcessError::NotFound(_) | ProcessError::NoMatch(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
