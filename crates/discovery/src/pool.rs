//! Orchestrator pool
//!
//! Selects orchestrators for a job within a bounded time. Every known
//! orchestrator is asked for its info concurrently; answers are filtered by
//! capability compatibility and split by penalty. Unpenalized orchestrators
//! are taken as they arrive, penalized ones are kept aside and used, least
//! penalized first, only if the round ends short.
//!
//! ```text
//!            shuffle                 fan-out (one task per address)
//! addresses ────────▶ [u3 u1 u4 u2] ──┬──▶ fetch ──▶ info_tx ──┐
//!                                     ├──▶ fetch ──▶ err_tx  ──┤
//!                                     └──▶ ...                  │
//!                                                               ▼
//!                      collector: select!(info, err, deadline)
//!                        compatible? ─ no ─▶ dropped
//!                          │ yes
//!                        penalty == 0 ─▶ selected
//!                          │ > 0
//!                        SuspensionQueue ─▶ top-up after the loop
//! ```

use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, timeout_at, Instant};
use url::Url;

use mediacast_core::{CapabilityComparator, OrchestratorInfo};

use crate::config::DiscoveryConfig;
use crate::fetch::{Broadcaster, FetchContext, OrchestratorInfoFetcher};
use crate::metrics::DiscoveryMetrics;
use crate::suspension::{Suspender, SuspensionQueue};
use crate::DiscoveryError;

/// Default deadline of a discovery round
pub const DEFAULT_ROUND_TIMEOUT: Duration = Duration::from_secs(3);

/// Extra acceptance check applied before the capability test
pub type OrchestratorPredicate = Arc<dyn Fn(&OrchestratorInfo) -> bool + Send + Sync>;

/// A failed info request, reported to the collector
#[derive(Debug)]
struct FetchFailure {
    uri: Url,
    error: DiscoveryError,
}

/// Fixed set of orchestrators a broadcaster can discover
pub struct OrchestratorPool {
    uris: Vec<Url>,
    pred: Option<OrchestratorPredicate>,
    bcast: Broadcaster,
    fetcher: Arc<dyn OrchestratorInfoFetcher>,
    timeout: Duration,
    metrics: Arc<DiscoveryMetrics>,
}

impl OrchestratorPool {
    /// Pool over `uris`, queried through `fetcher`
    pub fn new(
        bcast: Broadcaster,
        uris: Vec<Url>,
        fetcher: Arc<dyn OrchestratorInfoFetcher>,
    ) -> Self {
        if uris.is_empty() {
            tracing::error!("Orchestrator pool does not have any URIs");
        }

        Self {
            uris,
            pred: None,
            bcast,
            fetcher,
            timeout: DEFAULT_ROUND_TIMEOUT,
            metrics: Arc::new(DiscoveryMetrics::new()),
        }
    }

    /// Pool that additionally rejects orchestrators failing `pred`
    pub fn with_predicate(
        bcast: Broadcaster,
        uris: Vec<Url>,
        fetcher: Arc<dyn OrchestratorInfoFetcher>,
        pred: OrchestratorPredicate,
    ) -> Self {
        let mut pool = Self::new(bcast, uris, fetcher);
        pool.pred = Some(pred);
        pool
    }

    /// Pool built from configuration.
    ///
    /// Fails with [`DiscoveryError::Config`] if any configured address is
    /// not a valid URL.
    pub fn from_config(
        config: &DiscoveryConfig,
        fetcher: Arc<dyn OrchestratorInfoFetcher>,
    ) -> crate::Result<Self> {
        let uris = config.orchestrator_urls()?;
        let bcast = Broadcaster::new(config.broadcaster.address.clone());
        Ok(Self::new(bcast, uris, fetcher).with_timeout(config.timeout()))
    }

    /// Override the round deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Record into a shared metrics collector
    pub fn with_metrics(mut self, metrics: Arc<DiscoveryMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Known orchestrator addresses, in configuration order
    pub fn urls(&self) -> &[Url] {
        &self.uris
    }

    /// Number of known orchestrators
    pub fn size(&self) -> usize {
        self.uris.len()
    }

    /// Round deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Counters shared by every round of this pool
    pub fn metrics(&self) -> &Arc<DiscoveryMetrics> {
        &self.metrics
    }

    /// Select up to `num_orchestrators` orchestrators able to run a job
    /// requiring `caps`.
    ///
    /// Returns unpenalized orchestrators in arrival order, followed by
    /// penalized ones in ascending penalty order. Never waits past the
    /// round deadline; a short or empty result is the only signal that
    /// not enough orchestrators were found.
    ///
    /// Every known orchestrator is queried, in a fresh random order each
    /// round. When `num_orchestrators` is 0, or the pool is empty, nothing
    /// is dispatched and no round is recorded.
    pub async fn get_orchestrators(
        &self,
        num_orchestrators: usize,
        suspender: &dyn Suspender,
        caps: &dyn CapabilityComparator,
    ) -> Vec<OrchestratorInfo> {
        let num_available = self.uris.len();
        let num_orchestrators = num_orchestrators.min(num_available);
        if num_orchestrators == 0 {
            return Vec::new();
        }

        // Orchestrators that predate capability discovery support the
        // legacy feature set without advertising it, so they stay usable
        // for jobs that need nothing more.
        let legacy_caps_only = caps.legacy_only();

        let deadline = Instant::now() + self.timeout;
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (info_tx, mut info_rx) = mpsc::channel::<OrchestratorInfo>(num_available);
        let (err_tx, mut err_rx) = mpsc::channel::<FetchFailure>(num_available);

        // Shuffle a copy; the pool's own order is never touched
        let mut uris = self.uris.clone();
        uris.shuffle(&mut rand::thread_rng());

        self.metrics.round_started(num_available);
        for uri in uris {
            let fetcher = Arc::clone(&self.fetcher);
            let bcast = self.bcast.clone();
            let ctx = FetchContext::new(deadline, cancel_rx.clone());
            let info_tx = info_tx.clone();
            let err_tx = err_tx.clone();
            let timeout_ms = self.timeout.as_millis() as u64;

            tokio::spawn(async move {
                let result = timeout_at(deadline, fetcher.get_orchestrator_info(&ctx, &bcast, &uri))
                    .await
                    .unwrap_or_else(|_| {
                        Err(DiscoveryError::Timeout {
                            timeout_ms,
                            address: uri.to_string(),
                        })
                    });
                // The collector may be gone already; late results are discarded
                match result {
                    Ok(info) => {
                        let _ = info_tx.send(info).await;
                    }
                    Err(error) => {
                        let _ = err_tx.send(FetchFailure { uri, error }).await;
                    }
                }
            });
        }
        drop(info_tx);
        drop(err_tx);

        let round_end = sleep_until(deadline);
        tokio::pin!(round_end);

        let mut infos: Vec<OrchestratorInfo> = Vec::with_capacity(num_orchestrators);
        let mut suspended_infos = SuspensionQueue::new();
        let mut nb_resp = 0;
        let mut timed_out = false;

        while nb_resp < num_available && infos.len() < num_orchestrators && !timed_out {
            tokio::select! {
                Some(info) = info_rx.recv() => {
                    nb_resp += 1;
                    self.metrics.response_received();
                    if !self.is_compatible(&info, caps, legacy_caps_only) {
                        self.metrics.incompatible();
                        tracing::debug!(
                            transcoder = %info.transcoder,
                            legacy = info.is_legacy(),
                            "Skipping incompatible orchestrator"
                        );
                    } else {
                        let penalty = suspender.suspended(&info.transcoder);
                        if penalty == 0 {
                            infos.push(info);
                        } else {
                            self.metrics.suspended();
                            tracing::debug!(
                                transcoder = %info.transcoder,
                                penalty,
                                "Deferring suspended orchestrator"
                            );
                            suspended_infos.push(info, penalty);
                        }
                    }
                }
                Some(failure) = err_rx.recv() => {
                    nb_resp += 1;
                    self.metrics.response_received();
                    self.metrics.discovery_error();
                    tracing::warn!(
                        uri = %failure.uri,
                        error = %failure.error,
                        "Failed to fetch orchestrator info"
                    );
                }
                _ = &mut round_end => {
                    timed_out = true;
                }
            }
        }
        // Remaining requests are abandoned
        let _ = cancel_tx.send(true);

        while infos.len() < num_orchestrators {
            match suspended_infos.pop() {
                Some(suspension) => infos.push(suspension.orch),
                None => break,
            }
        }

        if timed_out {
            self.metrics.round_timed_out();
        }
        self.metrics.selected(infos.len());

        tracing::info!(
            "Done fetching orch info numOrch={} responses={}/{} timeout={}",
            infos.len(),
            nb_resp,
            num_available,
            timed_out
        );
        infos
    }

    fn is_compatible(
        &self,
        info: &OrchestratorInfo,
        caps: &dyn CapabilityComparator,
        legacy_caps_only: bool,
    ) -> bool {
        if let Some(pred) = &self.pred {
            if !pred(info) {
                return false;
            }
        }
        match &info.capabilities {
            Some(advertised) => caps.compatible_with(advertised),
            None => legacy_caps_only,
        }
    }
}

impl std::fmt::Debug for OrchestratorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorPool")
            .field("uris", &self.uris)
            .field("has_pred", &self.pred.is_some())
            .field("bcast", &self.bcast)
            .field("timeout", &self.timeout)
            .finish()
    }
}
