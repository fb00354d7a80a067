//! Key providers: where the identifiers to announce come from.
//!
//! A [`KeyProvider`] hands back a [`KeyStream`] immediately and fills it from
//! a background task, so announcing can start before enumeration finishes.
//!
//! - [`BlockstoreProvider`] forwards every key in the blockstore.
//! - [`PinnedProvider`] walks the pin set, streaming each reachable
//!   identifier exactly once per call.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use cairn_blocks::Blockstore;
use cairn_dag::{enumerate_children, DagError, LinkSource, StreamingSet};
use cairn_pin::Pinner;
use cairn_types::{or_cancel, CancellationToken, Cid};

use crate::error::{ProvideError, ProvideResult};

/// Identifiers produced by one provider call.
///
/// The stream ends when the producer is done, or as soon as the token is
/// cancelled. [`KeyStream::finish`] then reports how the producer ended.
#[derive(Debug)]
pub struct KeyStream {
    rx: mpsc::Receiver<Cid>,
    producer: Option<JoinHandle<ProvideResult<()>>>,
    cancel: CancellationToken,
}

impl KeyStream {
    /// A stream fed by a producer that reports no outcome of its own.
    pub fn new(rx: mpsc::Receiver<Cid>, cancel: CancellationToken) -> Self {
        Self {
            rx,
            producer: None,
            cancel,
        }
    }

    /// A stream fed by `producer`, whose result [`finish`](Self::finish) returns.
    pub fn with_producer(
        rx: mpsc::Receiver<Cid>,
        producer: JoinHandle<ProvideResult<()>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            rx,
            producer: Some(producer),
            cancel,
        }
    }

    /// The next identifier, or `None` once the stream is closed or cancelled.
    pub async fn recv(&mut self) -> Option<Cid> {
        or_cancel(&self.cancel, self.rx.recv()).await.ok().flatten()
    }

    /// Drain the stream.
    pub async fn collect_all(&mut self) -> Vec<Cid> {
        let mut keys = Vec::new();
        while let Some(cid) = self.recv().await {
            keys.push(cid);
        }
        keys
    }

    /// Stop receiving and wait for the producer to exit.
    ///
    /// Returns `Ok(())` if the producer completed or the consumer stopped
    /// early, and the producer's error if the enumeration was aborted.
    pub async fn finish(mut self) -> ProvideResult<()> {
        self.rx.close();
        let Some(producer) = self.producer.take() else {
            return Ok(());
        };
        match producer.await {
            Ok(result) => result,
            Err(e) => Err(ProvideError::ProducerPanicked(e.to_string())),
        }
    }
}

/// A source of identifiers to announce.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Start enumerating. Must be called from within a tokio runtime.
    async fn provide(&self, cancel: CancellationToken) -> ProvideResult<KeyStream>;
}

/// Announces every block in the store.
///
/// The store holds each identifier once, so no deduplication is done.
pub struct BlockstoreProvider {
    store: Arc<dyn Blockstore>,
}

impl BlockstoreProvider {
    pub fn new(store: Arc<dyn Blockstore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl KeyProvider for BlockstoreProvider {
    async fn provide(&self, cancel: CancellationToken) -> ProvideResult<KeyStream> {
        let rx = self.store.all_keys_chan(cancel.clone())?;
        Ok(KeyStream::new(rx, cancel))
    }
}

/// Announces pinned roots and, unless restricted to roots, everything
/// recursive pins reach.
pub struct PinnedProvider {
    pinner: Arc<dyn Pinner>,
    links: Arc<dyn LinkSource>,
    only_roots: bool,
}

impl PinnedProvider {
    pub fn new(pinner: Arc<dyn Pinner>, links: Arc<dyn LinkSource>, only_roots: bool) -> Self {
        Self {
            pinner,
            links,
            only_roots,
        }
    }

    /// Whether [`KeyProvider::provide`] skips descendants.
    pub fn only_roots(&self) -> bool {
        self.only_roots
    }

    /// Stream the pin set with an explicit roots-only choice.
    ///
    /// Direct pins are emitted first and never expanded on their own. Each
    /// recursive root follows, then (unless `only_roots`) its descendants up
    /// to the pin's depth. Every call starts from an empty set, so an
    /// identifier appears at most once per stream, yet a direct pin or a node
    /// cut off by one pin's depth is still walked when another recursive pin
    /// reaches it with depth to spare.
    pub fn provide_pins(&self, cancel: CancellationToken, only_roots: bool) -> KeyStream {
        let (set, rx) = StreamingSet::new(cancel.clone());
        let producer = tokio::spawn(stream_pins(
            set,
            self.pinner.clone(),
            self.links.clone(),
            only_roots,
            cancel.clone(),
        ));
        KeyStream::with_producer(rx, producer, cancel)
    }
}

#[async_trait]
impl KeyProvider for PinnedProvider {
    async fn provide(&self, cancel: CancellationToken) -> ProvideResult<KeyStream> {
        Ok(self.provide_pins(cancel, self.only_roots))
    }
}

/// Producer task body. Owns the set, so the channel closes when it returns.
async fn stream_pins(
    mut set: StreamingSet,
    pinner: Arc<dyn Pinner>,
    links: Arc<dyn LinkSource>,
    only_roots: bool,
    cancel: CancellationToken,
) -> ProvideResult<()> {
    let outcome = walk_pins(&mut set, &*pinner, &*links, only_roots, &cancel).await;
    match outcome {
        Ok(()) => {
            debug!(emitted = set.emitted(), only_roots, "pinned key stream complete");
            Ok(())
        }
        Err(ProvideError::Walk(DagError::ConsumerGone)) => {
            debug!(emitted = set.emitted(), "pinned key stream abandoned by consumer");
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            debug!(emitted = set.emitted(), "pinned key stream cancelled");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, emitted = set.emitted(), "reprovide indirect pins failed");
            Err(e)
        }
    }
}

async fn walk_pins(
    set: &mut StreamingSet,
    pinner: &dyn Pinner,
    links: &dyn LinkSource,
    only_roots: bool,
    cancel: &CancellationToken,
) -> ProvideResult<()> {
    for cid in pinner.direct_keys()? {
        set.add(cid).await?;
    }
    for pin in pinner.recursive_pins()? {
        set.add(pin.cid).await?;
        if only_roots || !set.claim_root(pin.cid, pin.max_depth) {
            continue;
        }
        let mut walk = set.walker(pin.max_depth);
        enumerate_children(cancel, links, pin.cid, pin.max_depth, &mut walk).await?;
    }
    Ok(())
}
