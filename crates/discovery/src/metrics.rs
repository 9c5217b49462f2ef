//! Metrics collection for orchestrator discovery
//!
//! Counters are shared between the pool and whoever reports them; every
//! discovery round records into the same [`DiscoveryMetrics`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Discovery metrics collector
#[derive(Debug, Default)]
pub struct DiscoveryMetrics {
    /// Discovery rounds started
    rounds: AtomicU64,

    /// Info requests dispatched
    requests: AtomicU64,

    /// Responses received (successful or failed)
    responses: AtomicU64,

    /// Failed info requests
    discovery_errors: AtomicU64,

    /// Responses rejected by the compatibility check
    incompatible: AtomicU64,

    /// Compatible responses deferred because of a penalty
    suspended: AtomicU64,

    /// Rounds that ended at the deadline
    timeouts: AtomicU64,

    /// Orchestrators returned to callers
    selected: AtomicU64,
}

impl DiscoveryMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a round dispatching `requests` calls
    pub fn round_started(&self, requests: usize) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
        self.requests.fetch_add(requests as u64, Ordering::Relaxed);
    }

    /// Record a response of any kind
    pub fn response_received(&self) {
        self.responses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed info request
    pub fn discovery_error(&self) {
        self.discovery_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an incompatible orchestrator
    pub fn incompatible(&self) {
        self.incompatible.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a penalized orchestrator
    pub fn suspended(&self) {
        self.suspended.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a round that hit its deadline
    pub fn round_timed_out(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the number of orchestrators a round returned
    pub fn selected(&self, count: usize) {
        self.selected.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> DiscoveryMetricsSnapshot {
        DiscoveryMetricsSnapshot {
            rounds: self.rounds.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            responses: self.responses.load(Ordering::Relaxed),
            discovery_errors: self.discovery_errors.load(Ordering::Relaxed),
            incompatible: self.incompatible.load(Ordering::Relaxed),
            suspended: self.suspended.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            selected: self.selected.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DiscoveryMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryMetricsSnapshot {
    pub rounds: u64,
    pub requests: u64,
    pub responses: u64,
    pub discovery_errors: u64,
    pub incompatible: u64,
    pub suspended: u64,
    pub timeouts: u64,
    pub selected: u64,
}
