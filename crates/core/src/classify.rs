//! Format and storage classification
//!
//! Classifiers translate the job's output formats and storage backend into
//! capability ids. The defaults cover the formats and backends this build
//! knows about; anything outside that closed list is a classification error.

use crate::capabilities::Capability;
use crate::params::{OutputFormat, StorageSession, StorageType};
use crate::{Error, Result};

/// Maps an output container format to the capability that produces it
pub trait FormatClassifier: Send + Sync {
    /// Capability required to emit `format`
    fn classify(&self, format: OutputFormat) -> Result<Capability>;
}

/// Maps a storage session to the capability needed to write to it
pub trait StorageClassifier: Send + Sync {
    /// Capability required to use `session`; [`Capability::UNUSED`] when
    /// there is no session
    fn classify(&self, session: Option<&dyn StorageSession>) -> Result<Capability>;
}

/// Classifier for the formats known to this build
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatClassifier;

impl FormatClassifier for DefaultFormatClassifier {
    fn classify(&self, format: OutputFormat) -> Result<Capability> {
        match format {
            // Unset format falls back to the MPEG-TS container
            OutputFormat::None | OutputFormat::MpegTs => Ok(Capability::MPEGTS),
            OutputFormat::Mp4 => Ok(Capability::MP4),
            OutputFormat::Unrecognized => Err(Error::FormatClassification {
                format: format.to_string(),
            }),
        }
    }
}

/// Classifier for the storage backends known to this build
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStorageClassifier;

impl StorageClassifier for DefaultStorageClassifier {
    fn classify(&self, session: Option<&dyn StorageSession>) -> Result<Capability> {
        let Some(info) = session.and_then(|s| s.info()) else {
            return Ok(Capability::UNUSED);
        };
        match info.storage_type {
            StorageType::Direct => Ok(Capability::STORAGE_DIRECT),
            StorageType::S3 => Ok(Capability::STORAGE_S3),
            StorageType::Google => Ok(Capability::STORAGE_GCS),
            StorageType::Unrecognized => Err(Error::StorageClassification {
                storage: info.storage_type.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::StaticStorageSession;

    #[test]
    fn test_every_known_format_classifies() {
        for format in [OutputFormat::None, OutputFormat::MpegTs, OutputFormat::Mp4] {
            assert!(DefaultFormatClassifier.classify(format).is_ok(), "{format}");
        }
        assert_eq!(
            DefaultFormatClassifier.classify(OutputFormat::None).unwrap(),
            Capability::MPEGTS
        );
    }

    #[test]
    fn test_unrecognized_format_fails() {
        let err = DefaultFormatClassifier
            .classify(OutputFormat::Unrecognized)
            .unwrap_err();
        assert!(matches!(err, Error::FormatClassification { .. }));
    }

    #[test]
    fn test_every_known_backend_classifies() {
        let expected = [
            (StorageType::Direct, Capability::STORAGE_DIRECT),
            (StorageType::S3, Capability::STORAGE_S3),
            (StorageType::Google, Capability::STORAGE_GCS),
        ];
        for (storage_type, cap) in expected {
            let session = StaticStorageSession::new(storage_type);
            assert_eq!(DefaultStorageClassifier.classify(Some(&session)).unwrap(), cap);
        }
    }

    #[test]
    fn test_unrecognized_backend_fails() {
        let session = StaticStorageSession::new(StorageType::Unrecognized);
        let err = DefaultStorageClassifier.classify(Some(&session)).unwrap_err();
        assert!(matches!(err, Error::StorageClassification { .. }));
    }

    #[test]
    fn test_absent_storage_is_unused() {
        assert_eq!(
            DefaultStorageClassifier.classify(None).unwrap(),
            Capability::UNUSED
        );
        let session = StaticStorageSession::without_info();
        assert_eq!(
            DefaultStorageClassifier.classify(Some(&session)).unwrap(),
            Capability::UNUSED
        );
    }
}
