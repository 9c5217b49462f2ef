//! mediacast core
//!
//! Capability model shared by broadcasters and orchestrators: how a job's
//! requirements are derived, how orchestrators advertise what they
//! support, and how the two are compared.
//!
//! # Overview
//!
//! ```text
//! StreamParameters ──▶ Capabilities::from_job ──▶ Capabilities (required)
//!                                                     │
//! OrchestratorInfo.capabilities (advertised) ─────────┤ compatible_with
//!                                                     ▼
//!                                                   bool
//! ```
//!
//! Orchestrators that omit their advertisement are legacy nodes; a job may
//! use them only when [`CapabilityComparator::legacy_only`] holds.

pub mod capabilities;
pub mod classify;
pub mod error;
pub mod params;
pub mod wire;

pub use capabilities::{
    legacy_capability_string, Capabilities, Capability, CapabilityComparator, CapabilityString,
    Constraints,
};
pub use error::{Error, Result};
pub use params::{OutputFormat, StorageSession, StorageType, StreamParameters, VideoProfile};
pub use wire::{NetCapabilities, OrchestratorInfo};
