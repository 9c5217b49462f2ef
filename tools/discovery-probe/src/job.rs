//! Job description flags and their translation into stream parameters

use clap::{Args, ValueEnum};
use std::sync::Arc;

use mediacast_core::params::StaticStorageSession;
use mediacast_core::{OutputFormat, StorageType, StreamParameters, VideoProfile};

/// Output container accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Mpegts,
    Mp4,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mpegts => OutputFormat::MpegTs,
            FormatArg::Mp4 => OutputFormat::Mp4,
        }
    }
}

/// Storage backend accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Direct,
    S3,
    Google,
}

impl From<StorageArg> for StorageType {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Direct => StorageType::Direct,
            StorageArg::S3 => StorageType::S3,
            StorageArg::Google => StorageType::Google,
        }
    }
}

/// Description of the job orchestrators must be able to run
#[derive(Debug, Clone, Default, Args)]
pub struct JobArgs {
    /// Output rendition format (repeat for several renditions)
    #[arg(long = "format", value_enum)]
    pub formats: Vec<FormatArg>,

    /// Framerate denominator applied to every rendition (non-zero requires
    /// fractional framerate support)
    #[arg(long, default_value_t = 0)]
    pub framerate_den: u32,

    /// Object storage the segments are written to
    #[arg(long, value_enum)]
    pub storage: Option<StorageArg>,
}

impl JobArgs {
    pub fn stream_parameters(&self) -> StreamParameters {
        let profiles = self
            .formats
            .iter()
            .map(|format| VideoProfile {
                format: (*format).into(),
                framerate_den: self.framerate_den,
                ..Default::default()
            })
            .collect();

        let params = StreamParameters::new(profiles);
        match self.storage {
            Some(storage) => params.with_storage(Arc::new(StaticStorageSession::new(storage.into()))),
            None => params,
        }
    }
}
