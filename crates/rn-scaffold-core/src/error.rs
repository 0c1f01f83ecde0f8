//! Error and warning types for the materialization engine

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Result alias used throughout the materialization engine
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Fatal errors raised while materializing a project
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// Malformed configuration, detected before touching the filesystem
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Filesystem operation failed on an entry expected to exist
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination directory already exists and overwrite was not requested
    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// Template data is unusable (bad manifest, missing root)
    #[error("Template error: {0}")]
    Template(String),
}

impl ScaffoldError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Extension for attaching an action and path to `io::Result`
pub trait IoContext<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|e| ScaffoldError::io(action, path, e))
    }
}

/// A non-fatal problem collected during materialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Stage or feature that produced the warning (e.g. "splash", "firebase")
    pub scope: &'static str,
    pub message: String,
}

impl Warning {
    pub fn new(scope: &'static str, message: impl Into<String>) -> Self {
        Self {
            scope,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.scope, self.message)
    }
}

/// Turn a per-file error into a warning, keeping successful values
pub(crate) fn soften<T>(
    result: Result<T>,
    scope: &'static str,
    warnings: &mut Vec<Warning>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warnings.push(Warning::new(scope, e.to_string()));
            None
        }
    }
}
