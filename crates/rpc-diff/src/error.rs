//! Error types for a comparison run

use crate::runner::MismatchReport;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for comparison operations
pub type DiffResult<T> = Result<T, DiffError>;

/// Errors that end a comparison run
///
/// None of these are recovered inside the crate. They travel up to the caller,
/// which decides how the process exits.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The run configuration is unusable: duplicate or missing servers, or a
    /// server with no host to name evidence files after
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    /// The HTTP exchange with a server could not complete
    #[error("request to {server} failed: {source}")]
    Transport {
        server: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request body could not be serialized
    #[error("failed to encode request body: {source}")]
    Encoding {
        #[source]
        source: serde_json::Error,
    },

    /// A response body was not a JSON object
    #[error("invalid response from {server}: {reason}")]
    Decoding { server: String, reason: String },

    /// Writing evidence to disk failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two adjacent servers returned different responses
    #[error("responses from {} and {} differ", .0.previous, .0.current)]
    Mismatch(Box<MismatchReport>),
}

impl DiffError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        DiffError::Config {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DiffError::Io {
            path: path.into(),
            source,
        }
    }
}
