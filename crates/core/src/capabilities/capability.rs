//! Capability identifiers
//!
//! A capability is a small integer naming one discrete feature an
//! orchestrator may support. The numbering is part of the wire format:
//! new capabilities are appended, existing ids are never renumbered or
//! recycled.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single capability.
///
/// Ids at or below [`Capability::UNUSED`] never contribute a bit to a
/// [`CapabilityString`](super::CapabilityString).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(pub i32);

impl Capability {
    /// Classification failure upstream
    pub const INVALID: Capability = Capability(-1);
    /// No-op flag, contributes nothing
    pub const UNUSED: Capability = Capability(0);
    /// Baseline H.264 transcoding, required by every job
    pub const H264: Capability = Capability(1);
    /// MPEG-TS output container
    pub const MPEGTS: Capability = Capability(2);
    /// MP4 output container
    pub const MP4: Capability = Capability(3);
    /// Output renditions with a fractional framerate
    pub const FRACTIONAL_FRAMERATES: Capability = Capability(4);
    /// Segments pushed directly to the broadcaster
    pub const STORAGE_DIRECT: Capability = Capability(5);
    /// S3-compatible object storage
    pub const STORAGE_S3: Capability = Capability(6);
    /// Google Cloud Storage
    pub const STORAGE_GCS: Capability = Capability(7);

    /// Raw integer id
    pub fn id(self) -> i32 {
        self.0
    }

    /// Whether this id sets a bit when encoded
    pub fn is_encodable(self) -> bool {
        self > Capability::UNUSED
    }

    /// Stable name for logging, `None` for ids this build does not know
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Capability::INVALID => "invalid",
            Capability::UNUSED => "unused",
            Capability::H264 => "h264",
            Capability::MPEGTS => "mpegts",
            Capability::MP4 => "mp4",
            Capability::FRACTIONAL_FRAMERATES => "fractional_framerates",
            Capability::STORAGE_DIRECT => "storage_direct",
            Capability::STORAGE_S3 => "storage_s3",
            Capability::STORAGE_GCS => "storage_gcs",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "capability({})", self.0),
        }
    }
}

impl From<i32> for Capability {
    fn from(id: i32) -> Self {
        Capability(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_not_encodable() {
        assert!(!Capability::INVALID.is_encodable());
        assert!(!Capability::UNUSED.is_encodable());
        assert!(!Capability(-10).is_encodable());
        assert!(Capability::H264.is_encodable());
    }

    #[test]
    fn test_display() {
        assert_eq!(Capability::STORAGE_S3.to_string(), "storage_s3");
        assert_eq!(Capability(193).to_string(), "capability(193)");
    }
}
