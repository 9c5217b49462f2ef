//! Wire types exchanged with orchestrators
//!
//! An orchestrator answers an info request with an [`OrchestratorInfo`].
//! Orchestrators that predate capability discovery omit the
//! `capabilities` field entirely; that absence is how legacy nodes are
//! recognized.

use serde::{Deserialize, Serialize};

use crate::capabilities::CapabilityString;
use crate::Result;

/// Capability advertisement as transmitted on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCapabilities {
    /// Capability bitmask, least significant word first
    #[serde(default)]
    pub bitstring: CapabilityString,
}

impl NetCapabilities {
    /// Advertisement carrying the given bitmask
    pub fn new(bitstring: CapabilityString) -> Self {
        Self { bitstring }
    }
}

/// Self-reported description of an orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorInfo {
    /// Transcoder endpoint jobs are sent to; identifies the node for
    /// suspension tracking
    pub transcoder: String,

    /// On-chain or operator address of the orchestrator, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Advertised capabilities; `None` for legacy orchestrators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<NetCapabilities>,
}

impl OrchestratorInfo {
    /// Info for a node that does not advertise capabilities
    pub fn legacy(transcoder: impl Into<String>) -> Self {
        Self {
            transcoder: transcoder.into(),
            address: None,
            capabilities: None,
        }
    }

    /// Info for a node advertising `capabilities`
    pub fn with_capabilities(transcoder: impl Into<String>, capabilities: NetCapabilities) -> Self {
        Self {
            transcoder: transcoder.into(),
            address: None,
            capabilities: Some(capabilities),
        }
    }

    /// Whether the node predates capability advertisement
    pub fn is_legacy(&self) -> bool {
        self.capabilities.is_none()
    }

    /// Decode an info payload from JSON
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode as JSON
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Capability;

    #[test]
    fn test_missing_capabilities_is_legacy() {
        let info = OrchestratorInfo::from_json(br#"{"transcoder":"https://o1:8935"}"#).unwrap();
        assert!(info.is_legacy());
        assert_eq!(info.transcoder, "https://o1:8935");
    }

    #[test]
    fn test_advertisement_decodes() {
        let info = OrchestratorInfo::from_json(
            br#"{"transcoder":"https://o2:8935","capabilities":{"bitstring":[14,0]}}"#,
        )
        .unwrap();
        let caps = info.capabilities.expect("capabilities present");
        assert_eq!(caps.bitstring.as_words(), &[14]);
        assert!(caps.bitstring.contains(Capability::MP4));
    }

    #[test]
    fn test_legacy_omits_field_when_encoded() {
        let json = OrchestratorInfo::legacy("https://o3:8935").to_json().unwrap();
        let text = String::from_utf8(json).unwrap();
        assert!(!text.contains("capabilities"));
    }

    #[test]
    fn test_malformed_payload_is_serialization_error() {
        let err = OrchestratorInfo::from_json(b"{not json").unwrap_err();
        assert!(matches!(err, crate::Error::Serialization(_)));
    }
}
