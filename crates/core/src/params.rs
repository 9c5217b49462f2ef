//! Stream parameters
//!
//! The subset of a transcoding job's description that determines which
//! capabilities an orchestrator needs: the requested output renditions and
//! where the transcoded segments are stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Output container format of a rendition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// No explicit format; the segment keeps the default MPEG-TS container
    #[default]
    None,
    /// MPEG transport stream
    MpegTs,
    /// Fragmented MP4
    Mp4,
    /// Any format this build does not recognize
    #[serde(other)]
    Unrecognized,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::None => "none",
            OutputFormat::MpegTs => "mpegts",
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// One requested output rendition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoProfile {
    /// Profile name, e.g. "P240p30fps16x9"
    #[serde(default)]
    pub name: String,

    /// Target container format
    #[serde(default)]
    pub format: OutputFormat,

    /// Framerate numerator (0 keeps the source framerate)
    #[serde(default)]
    pub framerate: u32,

    /// Framerate denominator; non-zero marks a fractional framerate
    #[serde(default)]
    pub framerate_den: u32,
}

impl VideoProfile {
    /// Profile with only a container format set
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Whether this rendition requires fractional framerate support
    pub fn is_fractional(&self) -> bool {
        self.framerate_den > 0
    }
}

/// Object storage backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Segments returned directly to the broadcaster
    Direct,
    /// S3-compatible storage
    S3,
    /// Google Cloud Storage
    Google,
    /// A backend this build does not recognize
    #[serde(other)]
    Unrecognized,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageType::Direct => "direct",
            StorageType::S3 => "s3",
            StorageType::Google => "google",
            StorageType::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// Storage description shared with orchestrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    /// Backend kind
    pub storage_type: StorageType,
}

/// Handle to an open storage session.
///
/// A session that reports no [`StorageInfo`] is treated like an absent
/// session: the job places no storage requirement on orchestrators.
pub trait StorageSession: fmt::Debug + Send + Sync {
    /// Storage description, if the session exposes one
    fn info(&self) -> Option<StorageInfo>;
}

/// Storage session backed by a fixed backend description
#[derive(Debug, Clone)]
pub struct StaticStorageSession {
    info: Option<StorageInfo>,
}

impl StaticStorageSession {
    /// Session on the given backend
    pub fn new(storage_type: StorageType) -> Self {
        Self {
            info: Some(StorageInfo { storage_type }),
        }
    }

    /// Session that exposes no storage description
    pub fn without_info() -> Self {
        Self { info: None }
    }
}

impl StorageSession for StaticStorageSession {
    fn info(&self) -> Option<StorageInfo> {
        self.info.clone()
    }
}

/// Everything about a job that shapes its capability requirement
#[derive(Debug, Clone, Default)]
pub struct StreamParameters {
    /// Requested output renditions, in order
    pub profiles: Vec<VideoProfile>,

    /// Storage session, if segments go to object storage
    pub storage: Option<Arc<dyn StorageSession>>,
}

impl StreamParameters {
    /// Parameters with the given renditions and no storage session
    pub fn new(profiles: Vec<VideoProfile>) -> Self {
        Self {
            profiles,
            storage: None,
        }
    }

    /// Attach a storage session
    pub fn with_storage(mut self, storage: Arc<dyn StorageSession>) -> Self {
        self.storage = Some(storage);
        self
    }
}
