use std::path::PathBuf;

use thiserror::Error;

/// Request-time failures of a version check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Program Not Found: {0}")]
    ProgramNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Startup failures while building the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog document: {0}")]
    Syntax(String),

    #[error("Malformed catalog entry at {location}: {reason}")]
    MalformedEntry { location: String, reason: String },
}

impl CatalogError {
    pub fn malformed(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedEntry {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
