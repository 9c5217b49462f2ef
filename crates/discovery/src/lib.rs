//! mediacast discovery
//!
//! Broadcaster-side orchestrator selection. Given a job's capability
//! requirement, a discovery round asks every known orchestrator for its
//! info in parallel and returns a bounded number of compatible ones,
//! preferring orchestrators without a recent-failure penalty.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       mediacast-discovery                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐    get_orchestrators(n, suspender, caps)   │
//! │  │ OrchestratorPool │──────────────────────────────────────────┐ │
//! │  └────────┬─────────┘                                          │ │
//! │           │ one task per address                               │ │
//! │           ▼                                                    ▼ │
//! │  ┌──────────────────────────┐   ┌───────────┐   ┌─────────────┐ │
//! │  │ OrchestratorInfoFetcher  │   │ Suspender │   │ Suspension- │ │
//! │  │ (HttpInfoFetcher, ...)   │   │ (penalty) │   │ Queue       │ │
//! │  └──────────────────────────┘   └───────────┘   └─────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod suspension;

pub use config::{ConfigError, DiscoveryConfig};
pub use error::{DiscoveryError, Result};
pub use fetch::{Broadcaster, FetchContext, OrchestratorInfoFetcher};
pub use http::HttpInfoFetcher;
pub use metrics::{DiscoveryMetrics, DiscoveryMetricsSnapshot};
pub use pool::{OrchestratorPool, OrchestratorPredicate, DEFAULT_ROUND_TIMEOUT};
pub use suspension::{NoSuspension, RoundSuspender, Suspender, Suspension, SuspensionQueue};
