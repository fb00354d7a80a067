use async_trait::async_trait;
use tokio::sync::mpsc;

use cairn_types::{or_cancel, CancellationToken, Cid};

use crate::depth::MaxDepth;
use crate::error::{DagError, DagResult};
use crate::set::{CidSet, ExpansionRecord};
use crate::walk::Visitor;

/// A [`CidSet`] that streams every first-time identifier to a consumer.
///
/// The channel holds at most one identifier, so the producer can never get
/// more than one identifier ahead of the consumer: memory stays bounded by
/// the set itself, not by the size of the walk.
///
/// Emission and expansion are tracked separately. An identifier is sent once,
/// but walks started through [`walker`](Self::walker) still expand it if they
/// reach it with more depth left than any earlier walk did.
///
/// The sender lives inside the set. Dropping the set (normally when the
/// producing task returns, by any path) closes the channel exactly once, and
/// the consumer's receive loop ends.
#[derive(Debug)]
pub struct StreamingSet {
    set: CidSet,
    expanded: ExpansionRecord,
    tx: mpsc::Sender<Cid>,
    cancel: CancellationToken,
    emitted: u64,
}

impl StreamingSet {
    /// An empty set and the receiving end of its channel.
    pub fn new(cancel: CancellationToken) -> (Self, mpsc::Receiver<Cid>) {
        let (tx, rx) = mpsc::channel(1);
        let set = Self {
            set: CidSet::new(),
            expanded: ExpansionRecord::new(),
            tx,
            cancel,
            emitted: 0,
        };
        (set, rx)
    }

    /// Record `cid` and, if it is new, hand it to the consumer.
    ///
    /// Waits while the consumer is behind. Returns `Ok(false)` without
    /// sending for repeats, [`DagError::Cancelled`] if the token fires while
    /// waiting, and [`DagError::ConsumerGone`] if the receiver was dropped.
    pub async fn add(&mut self, cid: Cid) -> DagResult<bool> {
        if !self.set.visit(cid) {
            return Ok(false);
        }
        or_cancel(&self.cancel, self.tx.send(cid))
            .await?
            .map_err(|_| DagError::ConsumerGone)?;
        self.emitted += 1;
        Ok(true)
    }

    /// Claim `root` for a walk bounded by `max_depth`.
    ///
    /// Returns `false` if earlier walks already went at least that deep below
    /// it, so walking it again would find nothing new.
    pub fn claim_root(&mut self, root: Cid, max_depth: MaxDepth) -> bool {
        self.expanded.admit(root, max_depth.remaining(0))
    }

    /// A visitor for one walk bounded by `max_depth`.
    ///
    /// It emits through [`add`](Self::add) and descends into a node only when
    /// this walk reaches it with more levels left than any earlier reach.
    pub fn walker(&mut self, max_depth: MaxDepth) -> StreamingWalk<'_> {
        StreamingWalk {
            set: self,
            max_depth,
        }
    }

    /// Identifiers handed to the consumer so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

/// Visitor returned by [`StreamingSet::walker`].
#[derive(Debug)]
pub struct StreamingWalk<'a> {
    set: &'a mut StreamingSet,
    max_depth: MaxDepth,
}

#[async_trait]
impl<'a> Visitor for StreamingWalk<'a> {
    async fn visit(&mut self, cid: Cid, depth: u32) -> DagResult<bool> {
        self.set.add(cid).await?;
        let remaining = self.max_depth.remaining(depth);
        Ok(self.set.expanded.admit(cid, remaining))
    }
}
