//! Configuration for orchestrator discovery
//!
//! Configuration can be loaded from a TOML file and/or environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main discovery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Known orchestrators
    #[serde(default)]
    pub orchestrators: OrchestratorsConfig,

    /// Discovery round settings
    #[serde(default)]
    pub discovery: RoundConfig,

    /// Identity presented to orchestrators
    #[serde(default)]
    pub broadcaster: BroadcasterConfig,
}

/// Known orchestrator addresses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorsConfig {
    /// Orchestrator base URLs
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// Discovery round settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Round deadline in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of orchestrators to select per round
    #[serde(default = "default_max_orchestrators")]
    pub max_orchestrators: usize,
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_max_orchestrators() -> usize {
    1
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_orchestrators: default_max_orchestrators(),
        }
    }
}

/// Broadcaster identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BroadcasterConfig {
    /// Address sent with every info request
    #[serde(default)]
    pub address: String,
}

impl DiscoveryConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: DiscoveryConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = DiscoveryConfig::default();

        if let Ok(addrs) = std::env::var("MEDIACAST_ORCH_ADDRS") {
            config.orchestrators.addresses = addrs
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(timeout) = std::env::var("MEDIACAST_DISCOVERY_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                config.discovery.timeout_ms = t;
            }
        }
        if let Ok(max) = std::env::var("MEDIACAST_MAX_ORCHESTRATORS") {
            if let Ok(m) = max.parse() {
                config.discovery.max_orchestrators = m;
            }
        }
        if let Ok(address) = std::env::var("MEDIACAST_BROADCASTER_ADDRESS") {
            config.broadcaster.address = address;
        }

        config
    }

    /// Load configuration from file if it exists, otherwise from environment
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        if let Some(p) = path {
            if p.as_ref().exists() {
                return Self::from_file(p);
            }
        }
        Ok(Self::from_env())
    }

    /// Parsed orchestrator URLs, in configuration order
    pub fn orchestrator_urls(&self) -> Result<Vec<Url>, ConfigError> {
        self.orchestrators
            .addresses
            .iter()
            .map(|addr| {
                Url::parse(addr).map_err(|e| ConfigError::InvalidAddress(format!("{addr}: {e}")))
            })
            .collect()
    }

    /// Round deadline
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.discovery.timeout_ms)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid orchestrator address {0}")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DiscoveryConfig::default();
        assert!(config.orchestrators.addresses.is_empty());
        assert_eq!(config.discovery.timeout_ms, 3000);
        assert_eq!(config.discovery.max_orchestrators, 1);
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
[orchestrators]
addresses = ["https://o1.example.com:8935", "https://o2.example.com:8935"]

[discovery]
timeout_ms = 500
max_orchestrators = 2

[broadcaster]
address = "0xb10adca57"
"#;

        let config: DiscoveryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.orchestrators.addresses.len(), 2);
        assert_eq!(config.discovery.timeout_ms, 500);
        assert_eq!(config.discovery.max_orchestrators, 2);
        assert_eq!(config.broadcaster.address, "0xb10adca57");

        let urls = config.orchestrator_urls().unwrap();
        assert_eq!(urls[0].host_str(), Some("o1.example.com"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DiscoveryConfig = toml::from_str("[discovery]\ntimeout_ms = 250\n").unwrap();
        assert_eq!(config.discovery.timeout_ms, 250);
        assert_eq!(config.discovery.max_orchestrators, 1);
    }

    #[test]
    fn test_invalid_address() {
        let mut config = DiscoveryConfig::default();
        config.orchestrators.addresses = vec!["not a url".to_string()];
        assert!(matches!(
            config.orchestrator_urls(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[orchestrators]\naddresses = [\"http://127.0.0.1:8935\"]").unwrap();

        let config = DiscoveryConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.orchestrators.addresses, vec!["http://127.0.0.1:8935"]);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[discovery\ntimeout_ms = ").unwrap();
        assert!(matches!(
            DiscoveryConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
