//! Remote orchestrator info fetch
//!
//! The transport used to ask an orchestrator for its info is pluggable.
//! Every call receives a [`FetchContext`] carrying the round deadline and a
//! cancellation signal that fires when the round no longer needs the
//! answer.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use url::Url;

use mediacast_core::OrchestratorInfo;

use crate::Result;

/// Identity of the broadcaster making discovery requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Broadcaster {
    address: String,
}

impl Broadcaster {
    /// Broadcaster identified by `address`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Address presented to orchestrators
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Deadline and cancellation shared by all requests of one round
#[derive(Debug, Clone)]
pub struct FetchContext {
    deadline: Instant,
    cancel: Option<watch::Receiver<bool>>,
}

impl FetchContext {
    /// Context bound to `deadline` and cancelled through `cancel`
    pub fn new(deadline: Instant, cancel: watch::Receiver<bool>) -> Self {
        Self {
            deadline,
            cancel: Some(cancel),
        }
    }

    /// Context with only a time budget, for requests made outside a round
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            cancel: None,
        }
    }

    /// Instant after which the answer is no longer wanted
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the round has already given up on this request
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolves once the round is cancelled.
    ///
    /// A round that is dropped without signalling counts as cancelled.
    /// Never resolves for contexts built with [`FetchContext::with_timeout`].
    pub async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Fetches an orchestrator's self-description.
///
/// Implementations must honor the context deadline and return promptly
/// once it elapses, either with a result or a timeout error.
#[async_trait]
pub trait OrchestratorInfoFetcher: Send + Sync {
    async fn get_orchestrator_info(
        &self,
        ctx: &FetchContext,
        bcast: &Broadcaster,
        uri: &Url,
    ) -> Result<OrchestratorInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_resolves_on_signal() {
        let (tx, rx) = watch::channel(false);
        let ctx = FetchContext::new(Instant::now() + Duration::from_secs(1), rx);
        assert!(!ctx.is_cancelled());

        let waiter = tokio::spawn({
            let ctx = ctx.clone();
            async move { ctx.cancelled().await }
        });
        tx.send(true).unwrap();
        waiter.await.unwrap();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_round_counts_as_cancelled() {
        let (tx, rx) = watch::channel(false);
        let ctx = FetchContext::new(Instant::now() + Duration::from_secs(1), rx);
        drop(tx);
        ctx.cancelled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_standalone_context_is_never_cancelled() {
        let ctx = FetchContext::with_timeout(Duration::from_millis(100));
        assert_eq!(ctx.remaining(), Duration::from_millis(100));
        let raced = tokio::time::timeout(Duration::from_millis(200), ctx.cancelled()).await;
        assert!(raced.is_err());
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_broadcaster_address() {
        assert_eq!(Broadcaster::new("0xabc").address(), "0xabc");
    }
}
