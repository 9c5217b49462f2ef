//! Legacy capability baseline
//!
//! Orchestrators released before capability discovery do not advertise a
//! bitstring, yet they support a fixed feature set. Jobs that need nothing
//! beyond that set can still be served by them.

use std::sync::OnceLock;

use super::{Capability, CapabilityString};

/// Capabilities every pre-discovery orchestrator supports
pub const LEGACY_CAPABILITIES: [Capability; 7] = [
    Capability::H264,
    Capability::MPEGTS,
    Capability::MP4,
    Capability::FRACTIONAL_FRAMERATES,
    Capability::STORAGE_DIRECT,
    Capability::STORAGE_S3,
    Capability::STORAGE_GCS,
];

static LEGACY_CAPABILITY_STRING: OnceLock<CapabilityString> = OnceLock::new();

/// Bitstring of [`LEGACY_CAPABILITIES`], built once per process
pub fn legacy_capability_string() -> &'static CapabilityString {
    LEGACY_CAPABILITY_STRING
        .get_or_init(|| CapabilityString::from_capabilities(LEGACY_CAPABILITIES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_string_covers_baseline() {
        let legacy = legacy_capability_string();
        for cap in LEGACY_CAPABILITIES {
            assert!(legacy.contains(cap), "{cap} missing from legacy baseline");
        }
        assert_eq!(legacy.as_words(), &[0b1111_1110]);
    }

    #[test]
    fn test_legacy_string_is_shared() {
        assert!(std::ptr::eq(
            legacy_capability_string(),
            legacy_capability_string()
        ));
    }
}
