//! HTTP orchestrator info fetcher
//!
//! Asks `GET {orchestrator}/orchestrator/info` for a JSON
//! [`OrchestratorInfo`]. The broadcaster address travels in the
//! `X-Broadcaster-Address` header.

use async_trait::async_trait;
use url::Url;

use mediacast_core::OrchestratorInfo;

use crate::fetch::{Broadcaster, FetchContext, OrchestratorInfoFetcher};
use crate::{DiscoveryError, Result};

/// Path of the info endpoint relative to an orchestrator's base URL
pub const INFO_PATH: &str = "orchestrator/info";

/// Header carrying the broadcaster address
pub const BROADCASTER_HEADER: &str = "X-Broadcaster-Address";

/// [`OrchestratorInfoFetcher`] over plain HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpInfoFetcher {
    client: reqwest::Client,
}

impl HttpInfoFetcher {
    /// Create a fetcher with its own connection pool
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DiscoveryError::Http {
                address: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Create a fetcher sharing an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Info endpoint for an orchestrator base URL
    pub fn info_url(uri: &Url) -> Result<Url> {
        let mut base = uri.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(INFO_PATH)
            .map_err(|e| DiscoveryError::InvalidAddress {
                address: uri.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl OrchestratorInfoFetcher for HttpInfoFetcher {
    async fn get_orchestrator_info(
        &self,
        ctx: &FetchContext,
        bcast: &Broadcaster,
        uri: &Url,
    ) -> Result<OrchestratorInfo> {
        let address = uri.to_string();
        let endpoint = Self::info_url(uri)?;
        let budget = ctx.remaining();

        let request = self
            .client
            .get(endpoint)
            .header(BROADCASTER_HEADER, bcast.address())
            .timeout(budget)
            .send();

        let response = tokio::select! {
            response = request => response.map_err(|e| {
                if e.is_timeout() {
                    DiscoveryError::Timeout {
                        timeout_ms: budget.as_millis() as u64,
                        address: address.clone(),
                    }
                } else {
                    DiscoveryError::Http {
                        address: address.clone(),
                        reason: e.to_string(),
                    }
                }
            })?,
            _ = ctx.cancelled() => {
                return Err(DiscoveryError::Cancelled { address });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status {
                address,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| DiscoveryError::Http {
            address: address.clone(),
            reason: e.to_string(),
        })?;

        OrchestratorInfo::from_json(&body).map_err(|e| DiscoveryError::Decode {
            address,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_url_appends_path() {
        let uri = Url::parse("https://o1.example.com:8935").unwrap();
        assert_eq!(
            HttpInfoFetcher::info_url(&uri).unwrap().as_str(),
            "https://o1.example.com:8935/orchestrator/info"
        );
    }

    #[test]
    fn test_info_url_keeps_base_path() {
        let uri = Url::parse("https://gw.example.com/region/eu").unwrap();
        assert_eq!(
            HttpInfoFetcher::info_url(&uri).unwrap().as_str(),
            "https://gw.example.com/region/eu/orchestrator/info"
        );
    }
}
