//! Error types for mediacast core

use thiserror::Error;

/// Result type alias for mediacast core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while deriving a job's capability requirement
#[derive(Debug, Error)]
pub enum Error {
    /// Output format outside the known enumeration
    #[error("capability: unknown format {format}")]
    FormatClassification {
        /// Format as reported by the job
        format: String,
    },

    /// Storage backend outside the known enumeration
    #[error("capability: unknown storage {storage}")]
    StorageClassification {
        /// Backend kind as reported by the session
        storage: String,
    },

    /// Wire payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error came from classifying job parameters.
    ///
    /// Such errors mean the job cannot be submitted as described and
    /// must not be retried unchanged.
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            Error::FormatClassification { .. } | Error::StorageClassification { .. }
        )
    }
}
