//! Job capability requirements
//!
//! [`Capabilities`] is the broadcaster-side view: the minimal set of
//! capabilities an orchestrator must advertise to take a job. It is derived
//! once per job from [`StreamParameters`] and compared against every
//! orchestrator's advertisement during discovery.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::legacy::legacy_capability_string;
use super::{Capability, CapabilityString};
use crate::classify::{
    DefaultFormatClassifier, DefaultStorageClassifier, FormatClassifier, StorageClassifier,
};
use crate::params::StreamParameters;
use crate::wire::NetCapabilities;
use crate::Result;

/// Non-boolean requirements attached to a capability set.
///
/// Nothing is expressed here yet; the type keeps a place for numeric
/// limits so they can be added without changing `Capabilities`' shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {}

/// Capability requirement of a single job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    bitstring: CapabilityString,
    #[serde(default)]
    constraints: Constraints,
}

impl Capabilities {
    /// Requirement consisting of exactly `caps`
    pub fn new<I>(caps: I) -> Self
    where
        I: IntoIterator<Item = Capability>,
    {
        Self {
            bitstring: CapabilityString::from_capabilities(caps),
            constraints: Constraints::default(),
        }
    }

    /// Derive a job's requirement using the default classifiers
    pub fn from_job(params: &StreamParameters) -> Result<Self> {
        Self::from_job_with(params, &DefaultFormatClassifier, &DefaultStorageClassifier)
    }

    /// Derive a job's requirement.
    ///
    /// H.264 is always required. Every profile adds its container format
    /// and, when it has a framerate denominator, fractional framerate
    /// support. The storage session adds its backend. Any classification
    /// failure aborts the derivation.
    pub fn from_job_with(
        params: &StreamParameters,
        formats: &dyn FormatClassifier,
        storage: &dyn StorageClassifier,
    ) -> Result<Self> {
        let mut caps = BTreeSet::new();
        caps.insert(Capability::H264);

        for profile in &params.profiles {
            caps.insert(formats.classify(profile.format)?);
            if profile.is_fractional() {
                caps.insert(Capability::FRACTIONAL_FRAMERATES);
            }
        }

        caps.insert(storage.classify(params.storage.as_deref())?);

        Ok(Self::new(caps))
    }

    /// Requirement bitmask
    pub fn bitstring(&self) -> &CapabilityString {
        &self.bitstring
    }

    /// Non-boolean constraints
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Wire form of this capability set
    pub fn to_net_capabilities(&self) -> NetCapabilities {
        NetCapabilities::new(self.bitstring.clone())
    }
}

/// Compares a job requirement against orchestrator advertisements.
///
/// Implemented for [`Capabilities`] and for `Option<&Capabilities>`. An
/// absent requirement fails closed: it is compatible with nothing and
/// never counts as legacy-only.
pub trait CapabilityComparator: Send + Sync {
    /// Whether `advertised` covers every required capability
    fn compatible_with(&self, advertised: &NetCapabilities) -> bool;

    /// Whether a pre-discovery orchestrator can serve the job
    fn legacy_only(&self) -> bool;
}

impl CapabilityComparator for Capabilities {
    fn compatible_with(&self, advertised: &NetCapabilities) -> bool {
        self.bitstring.compatible_with(&advertised.bitstring)
    }

    fn legacy_only(&self) -> bool {
        self.bitstring.compatible_with(legacy_capability_string())
    }
}

impl CapabilityComparator for Option<&Capabilities> {
    fn compatible_with(&self, advertised: &NetCapabilities) -> bool {
        match self {
            Some(caps) => caps.compatible_with(advertised),
            None => false,
        }
    }

    fn legacy_only(&self) -> bool {
        match self {
            Some(caps) => caps.legacy_only(),
            None => false,
        }
    }
}

impl CapabilityComparator for Option<Capabilities> {
    fn compatible_with(&self, advertised: &NetCapabilities) -> bool {
        self.as_ref().compatible_with(advertised)
    }

    fn legacy_only(&self) -> bool {
        self.as_ref().legacy_only()
    }
}
