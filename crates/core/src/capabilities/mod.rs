//! Capability discovery primitives
//!
//! - [`Capability`]: integer id of one feature
//! - [`CapabilityString`]: dense bitmask codec and subset test
//! - [`Capabilities`]: a job's requirement, derived from its parameters
//! - [`legacy_capability_string`]: the baseline of pre-discovery nodes

mod bitstring;
mod capability;
mod job;
mod legacy;

pub use bitstring::CapabilityString;
pub use capability::Capability;
pub use job::{Capabilities, CapabilityComparator, Constraints};
pub use legacy::{legacy_capability_string, LEGACY_CAPABILITIES};
