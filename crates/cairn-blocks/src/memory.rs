use std::collections::HashMap;
use std::sync::RwLock;

use cairn_types::{or_cancel, CancellationToken, Cancelled, Cid};
use tokio::sync::mpsc;
use tracing::debug;

use crate::block::{Block, Verification};
use crate::error::BlockResult;
use crate::store::Blockstore;

/// In-memory, HashMap-based block store.
///
/// Intended for tests and embedding. All blocks are held in memory behind a
/// `RwLock` for safe concurrent access. Block payloads are reference-counted,
/// so reads are cheap.
pub struct InMemoryBlockstore {
    blocks: RwLock<HashMap<Cid, Block>>,
    hash_on_read: bool,
}

impl InMemoryBlockstore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
            hash_on_read: false,
        }
    }

    /// Re-verify every block's digest on `get`.
    pub fn with_hash_on_read(mut self, enabled: bool) -> Self {
        self.hash_on_read = enabled;
        self
    }

    /// Number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }

    /// Total payload bytes across all stored blocks.
    pub fn total_bytes(&self) -> u64 {
        self.blocks
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Return a sorted list of all identifiers in the store.
    pub fn all_cids(&self) -> Vec<Cid> {
        let map = self.blocks.read().expect("lock poisoned");
        let mut cids: Vec<Cid> = map.keys().copied().collect();
        cids.sort();
        cids
    }
}

impl Default for InMemoryBlockstore {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockstore for InMemoryBlockstore {
    fn get(&self, cid: &Cid) -> BlockResult<Option<Block>> {
        let block = self.blocks.read().expect("lock poisoned").get(cid).cloned();
        match block {
            Some(block) if self.hash_on_read => {
                Block::new_with_cid(block.data().clone(), *cid, Verification::Verify).map(Some)
            }
            other => Ok(other),
        }
    }

    fn put(&self, block: Block) -> BlockResult<Cid> {
        let cid = block.cid();
        let mut map = self.blocks.write().expect("lock poisoned");
        map.entry(cid).or_insert(block);
        Ok(cid)
    }

    fn has(&self, cid: &Cid) -> BlockResult<bool> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.contains_key(cid))
    }

    fn delete(&self, cid: &Cid) -> BlockResult<bool> {
        let mut map = self.blocks.write().expect("lock poisoned");
        Ok(map.remove(cid).is_some())
    }

    fn all_keys_chan(&self, cancel: CancellationToken) -> BlockResult<mpsc::Receiver<Cid>> {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }
        let keys = self.all_cids();
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            let total = keys.len();
            let mut sent = 0usize;
            for cid in keys {
                match or_cancel(&cancel, tx.send(cid)).await {
                    Ok(Ok(())) => sent += 1,
                    Ok(Err(_)) => {
                        debug!(sent, total, "all-keys consumer went away");
                        return;
                    }
                    Err(_) => {
                        debug!(sent, total, "all-keys enumeration cancelled");
                        return;
                    }
                }
            }
            debug!(sent, "all-keys enumeration finished");
        });

        Ok(rx)
    }
}

impl std::fmt::Debug for InMemoryBlockstore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryBlockstore")
            .field("block_count", &count)
            .field("hash_on_read", &self.hash_on_read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockError;
    use std::sync::Arc;
    use std::time::Duration;

    fn block(content: &'static [u8]) -> Block {
        Block::new(content)
    }

    async fn drain(mut rx: mpsc::Receiver<Cid>) -> Vec<Cid> {
        let mut out = Vec::new();
        while let Some(cid) = rx.recv().await {
            out.push(cid);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryBlockstore::new();
        let b = block(b"hello world");
        let cid = store.put(b.clone()).unwrap();
        assert_eq!(cid, b.cid());

        let read_back = store.get(&cid).unwrap().expect("should exist");
        assert_eq!(read_back, b);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryBlockstore::new();
        assert!(store.get(&block(b"missing").cid()).unwrap().is_none());
    }

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryBlockstore::new();
        let id1 = store.put(block(b"same")).unwrap();
        let id2 = store.put(block(b"same")).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn has_and_delete() {
        let store = InMemoryBlockstore::new();
        let cid = store.put(block(b"to-delete")).unwrap();
        assert!(store.has(&cid).unwrap());
        assert!(store.delete(&cid).unwrap());
        assert!(!store.has(&cid).unwrap());
        assert!(!store.delete(&cid).unwrap());
    }

    #[test]
    fn put_many_stores_each_block() {
        let store = InMemoryBlockstore::new();
        let cids = store
            .put_many(vec![block(b"1"), block(b"2"), block(b"3")])
            .unwrap();
        assert_eq!(cids.len(), 3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.total_bytes(), 3);
    }

    #[test]
    fn all_cids_is_sorted() {
        let store = InMemoryBlockstore::new();
        store
            .put_many(vec![block(b"aaa"), block(b"bbb"), block(b"ccc")])
            .unwrap();
        let cids = store.all_cids();
        assert_eq!(cids.len(), 3);
        for w in cids.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    // -----------------------------------------------------------------------
    // Hash verification on read
    // -----------------------------------------------------------------------

    #[test]
    fn hash_on_read_rejects_corrupted_blocks() {
        let store = InMemoryBlockstore::new().with_hash_on_read(true);
        let forged = Cid::raw([0x11; 32]);
        let bad = Block::new_with_cid(&b"corrupt"[..], forged, Verification::Trust).unwrap();
        store.put(bad).unwrap();
        assert!(matches!(
            store.get(&forged),
            Err(BlockError::IntegrityMismatch { .. })
        ));
    }

    #[test]
    fn hash_on_read_passes_good_blocks() {
        let store = InMemoryBlockstore::new().with_hash_on_read(true);
        let cid = store.put(block(b"fine")).unwrap();
        assert!(store.get(&cid).unwrap().is_some());
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn all_keys_chan_yields_every_key_once() {
        let store = InMemoryBlockstore::new();
        store
            .put_many(vec![block(b"x"), block(b"y"), block(b"z")])
            .unwrap();

        let mut keys = drain(store.all_keys_chan(CancellationToken::new()).unwrap()).await;
        keys.sort();
        assert_eq!(keys, store.all_cids());
    }

    #[tokio::test]
    async fn all_keys_chan_on_empty_store_closes_immediately() {
        let store = InMemoryBlockstore::new();
        let keys = drain(store.all_keys_chan(CancellationToken::new()).unwrap()).await;
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn all_keys_chan_closes_on_cancel() {
        let store = InMemoryBlockstore::new();
        for i in 0..64u8 {
            store.put(Block::new(vec![i])).unwrap();
        }
        let cancel = CancellationToken::new();
        let mut rx = store.all_keys_chan(cancel.clone()).unwrap();
        assert!(rx.recv().await.is_some());
        cancel.cancel();

        let rest = tokio::time::timeout(Duration::from_secs(1), drain(rx))
            .await
            .expect("channel must close after cancellation");
        assert!(rest.len() < 63);
    }

    #[tokio::test]
    async fn all_keys_chan_refuses_cancelled_token() {
        let store = InMemoryBlockstore::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            store.all_keys_chan(cancel),
            Err(BlockError::Cancelled(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Concurrent read safety
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_reads_are_safe() {
        use std::thread;

        let store = Arc::new(InMemoryBlockstore::new());
        let cid = store.put(block(b"shared data")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let read = store.get(&cid).unwrap().expect("present");
                    assert!(read.verify());
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryBlockstore::new();
        store.put(block(b"x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryBlockstore"));
        assert!(debug.contains("block_count"));
    }
}
