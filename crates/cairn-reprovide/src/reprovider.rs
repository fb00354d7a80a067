//! The periodic reprovide loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use cairn_types::{or_cancel, CancellationToken, Cancelled, Cid};

use crate::config::ReprovideConfig;
use crate::error::ProvideResult;
use crate::provider::{KeyProvider, KeyStream};

/// Publishes provider records to the routing layer.
#[async_trait]
pub trait ContentRouting: Send + Sync {
    /// Announce that this node holds `cid`.
    async fn provide(&self, cid: Cid) -> ProvideResult<()>;
}

/// Outcome of one reprovide round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReprovideReport {
    pub announced: u64,
    pub elapsed: Duration,
}

/// Drains a key provider into the routing layer on a fixed interval.
pub struct Reprovider {
    provider: Arc<dyn KeyProvider>,
    routing: Arc<dyn ContentRouting>,
    config: ReprovideConfig,
}

impl Reprovider {
    pub fn new(
        provider: Arc<dyn KeyProvider>,
        routing: Arc<dyn ContentRouting>,
        config: ReprovideConfig,
    ) -> Self {
        Self {
            provider,
            routing,
            config,
        }
    }

    pub fn config(&self) -> &ReprovideConfig {
        &self.config
    }

    /// Announce every identifier the provider yields, once.
    ///
    /// Stops at the first routing error or when `cancel` fires. A provider
    /// whose enumeration aborted fails the round even if some identifiers
    /// were already announced.
    pub async fn reprovide(&self, cancel: &CancellationToken) -> ProvideResult<ReprovideReport> {
        let started = Instant::now();
        let mut keys = self.provider.provide(cancel.clone()).await?;
        let mut announced = 0u64;

        while let Some(cid) = keys.recv().await {
            let routed = match or_cancel(cancel, self.routing.provide(cid)).await {
                Ok(routed) => routed,
                Err(cancelled) => {
                    finish_stopped(keys).await;
                    return Err(cancelled.into());
                }
            };
            if let Err(e) = routed {
                warn!(cid = %cid.short_hex(), error = %e, announced, "provide failed, ending round");
                finish_stopped(keys).await;
                return Err(e);
            }
            announced += 1;
        }

        if cancel.is_cancelled() {
            finish_stopped(keys).await;
            return Err(Cancelled.into());
        }
        keys.finish().await?;

        let report = ReprovideReport {
            announced,
            elapsed: started.elapsed(),
        };
        info!(
            strategy = %self.config.strategy,
            announced,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "reprovide round complete"
        );
        Ok(report)
    }

    /// Run [`reprovide`](Self::reprovide) every interval until `cancel` fires.
    ///
    /// The first round starts immediately. Failed rounds are logged and the
    /// loop carries on. Returns the number of rounds that completed.
    pub async fn run(&self, cancel: CancellationToken) -> ProvideResult<u64> {
        if !self.config.enabled {
            info!("reprovider disabled");
            return Ok(0);
        }
        self.config.validate()?;

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            strategy = %self.config.strategy,
            interval_secs = self.config.interval.as_secs(),
            "reprovider started"
        );

        let mut completed = 0u64;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(completed, "reprovider shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.reprovide(&cancel).await {
                        Ok(_) => completed += 1,
                        Err(e) if e.is_cancelled() => warn!("reprovide round cancelled"),
                        Err(e) => error!(error = %e, "reprovide round failed"),
                    }
                }
            }
        }
        debug!(completed, "reprovider stopped");
        Ok(completed)
    }

    /// Run the loop on a background task. Cancel the returned token to stop it.
    pub fn spawn(self: Arc<Self>) -> (CancellationToken, JoinHandle<ProvideResult<u64>>) {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { self.run(token).await });
        (cancel, handle)
    }
}

/// Join the producer of a round that already failed. Its own error is only
/// logged; the round reports why it stopped.
async fn finish_stopped(keys: KeyStream) {
    if let Err(e) = keys.finish().await {
        debug!(error = %e, "key producer failed after the round stopped");
    }
}
