//! Error types for orchestrator discovery

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Failure of a single orchestrator info request.
///
/// None of these abort a discovery round; the orchestrator is left out
/// of that round's results.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No answer before the round deadline
    #[error("Orchestrator info timeout after {timeout_ms}ms: {address}")]
    Timeout {
        /// Time budget that elapsed
        timeout_ms: u64,
        /// Orchestrator address
        address: String,
    },

    /// The round finished before the request did
    #[error("Orchestrator info request cancelled: {address}")]
    Cancelled {
        /// Orchestrator address
        address: String,
    },

    /// Orchestrator address cannot be turned into a request URL
    #[error("Invalid orchestrator address {address}: {reason}")]
    InvalidAddress {
        /// Orchestrator address
        address: String,
        /// Parse failure
        reason: String,
    },

    /// Transport-level failure
    #[error("Orchestrator info request to {address} failed: {reason}")]
    Http {
        /// Orchestrator address
        address: String,
        /// Failure reason
        reason: String,
    },

    /// Non-success HTTP status
    #[error("Orchestrator {address} answered with status {status}")]
    Status {
        /// Orchestrator address
        address: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body is not a valid orchestrator info payload
    #[error("Invalid orchestrator info from {address}: {reason}")]
    Decode {
        /// Orchestrator address
        address: String,
        /// Decode failure
        reason: String,
    },

    /// Discovery configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DiscoveryError {
    /// Whether the request ran out of time rather than failing outright
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DiscoveryError::Timeout { .. } | DiscoveryError::Cancelled { .. }
        )
    }
}
