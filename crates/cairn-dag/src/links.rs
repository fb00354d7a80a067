use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use cairn_blocks::{links_of, Block, Blockstore, Verification};
use cairn_types::Cid;

use crate::error::{DagError, DagResult};

/// Resolves a node's ordered child links.
///
/// Implementations may perform I/O and must be safe to share between
/// concurrent walks.
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// The children of `cid`, in link order. Empty for leaves.
    async fn get_links(&self, cid: &Cid) -> DagResult<Vec<Cid>>;
}

#[async_trait]
impl<T: LinkSource + ?Sized> LinkSource for Arc<T> {
    async fn get_links(&self, cid: &Cid) -> DagResult<Vec<Cid>> {
        (**self).get_links(cid).await
    }
}

/// Reads links out of blocks held in a [`Blockstore`].
///
/// Raw blocks are leaves; DAG-node blocks are decoded. A missing block is a
/// resolution error, since the walk cannot know what lies below it. With
/// [`Verification::Verify`] (the default) every fetched block is re-hashed
/// against the identifier it was requested under before it is decoded.
pub struct StoreLinkSource<S: ?Sized> {
    store: Arc<S>,
    verification: Verification,
}

impl<S: Blockstore + ?Sized> StoreLinkSource<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            verification: Verification::default(),
        }
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    pub fn verification(&self) -> Verification {
        self.verification
    }
}

#[async_trait]
impl<S: Blockstore + ?Sized> LinkSource for StoreLinkSource<S> {
    async fn get_links(&self, cid: &Cid) -> DagResult<Vec<Cid>> {
        let resolution = |reason: String| DagError::LinkResolution { cid: *cid, reason };
        let stored = self
            .store
            .get(cid)
            .map_err(|e| resolution(e.to_string()))?
            .ok_or_else(|| resolution("block not found".into()))?;
        let block = Block::new_with_cid(stored.data().clone(), *cid, self.verification)
            .map_err(|e| resolution(e.to_string()))?;
        links_of(&block).map_err(|e| resolution(e.to_string()))
    }
}

/// In-memory adjacency map.
///
/// Unlike content-addressed blocks it can express cycles, and it can be told
/// to fail on specific nodes, which makes it the fixture for walk tests.
/// Unknown identifiers are leaves.
#[derive(Debug, Default)]
pub struct LinkGraph {
    edges: RwLock<HashMap<Cid, Vec<Cid>>>,
    failing: RwLock<HashSet<Cid>>,
    fetches: RwLock<HashMap<Cid, usize>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the children of `parent`, replacing any previous links.
    pub fn link(&self, parent: Cid, children: Vec<Cid>) {
        self.edges
            .write()
            .expect("lock poisoned")
            .insert(parent, children);
    }

    /// Make every `get_links(cid)` fail.
    pub fn fail_on(&self, cid: Cid) {
        self.failing.write().expect("lock poisoned").insert(cid);
    }

    /// How many times the links of `cid` were requested.
    pub fn fetch_count(&self, cid: &Cid) -> usize {
        self.fetches
            .read()
            .expect("lock poisoned")
            .get(cid)
            .copied()
            .unwrap_or(0)
    }

    /// Number of nodes with recorded links.
    pub fn len(&self) -> usize {
        self.edges.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LinkSource for LinkGraph {
    async fn get_links(&self, cid: &Cid) -> DagResult<Vec<Cid>> {
        *self
            .fetches
            .write()
            .expect("lock poisoned")
            .entry(*cid)
            .or_insert(0) += 1;

        if self.failing.read().expect("lock poisoned").contains(cid) {
            return Err(DagError::LinkResolution {
                cid: *cid,
                reason: "injected failure".into(),
            });
        }
        Ok(self
            .edges
            .read()
            .expect("lock poisoned")
            .get(cid)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_blocks::{DagNode, InMemoryBlockstore};
    use cairn_types::Codec;

    /// Stores a valid node under the identifier of different bytes.
    fn store_with_tampered_node() -> (Arc<InMemoryBlockstore>, Cid, Cid) {
        let store = Arc::new(InMemoryBlockstore::new());
        let child = Block::new(&b"child"[..]).cid();
        let node = DagNode::with_links(vec![child]).to_block().unwrap();
        let claimed = DagNode::with_links(Vec::new()).to_block().unwrap().cid();
        let tampered =
            Block::new_with_cid(node.data().clone(), claimed, Verification::Trust).unwrap();
        store.put(tampered).unwrap();
        (store, claimed, child)
    }

    #[tokio::test]
    async fn store_source_decodes_node_links() {
        let store = Arc::new(InMemoryBlockstore::new());
        let a = store.put(Block::new(&b"a"[..])).unwrap();
        let b = store.put(Block::new(&b"b"[..])).unwrap();
        let root = store
            .put(DagNode::with_links(vec![b, a]).to_block().unwrap())
            .unwrap();

        let source = StoreLinkSource::new(store);
        assert_eq!(source.get_links(&root).await.unwrap(), vec![b, a]);
        assert!(source.get_links(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_source_reports_missing_blocks() {
        let store = Arc::new(InMemoryBlockstore::new());
        let source = StoreLinkSource::new(store);
        let missing = Block::new(&b"nowhere"[..]).cid();
        let err = source.get_links(&missing).await.unwrap_err();
        assert!(matches!(err, DagError::LinkResolution { cid, .. } if cid == missing));
    }

    #[tokio::test]
    async fn store_source_reports_corrupt_nodes() {
        let store = Arc::new(InMemoryBlockstore::new());
        let cid = store
            .put(Block::with_codec(Codec::DagNode, vec![1u8, 2, 3]))
            .unwrap();
        let source = StoreLinkSource::new(store);
        assert!(source.get_links(&cid).await.is_err());
    }

    #[tokio::test]
    async fn store_source_verifies_by_default() {
        let (store, claimed, _) = store_with_tampered_node();
        let source = StoreLinkSource::new(store);
        assert_eq!(source.verification(), Verification::Verify);
        let err = source.get_links(&claimed).await.unwrap_err();
        assert!(matches!(err, DagError::LinkResolution { cid, .. } if cid == claimed));
    }

    #[tokio::test]
    async fn trusting_source_skips_the_digest_check() {
        let (store, claimed, child) = store_with_tampered_node();
        let source = StoreLinkSource::new(store).with_verification(Verification::Trust);
        assert_eq!(source.get_links(&claimed).await.unwrap(), vec![child]);
    }

    #[tokio::test]
    async fn store_source_works_through_trait_objects() {
        let store: Arc<dyn Blockstore> = Arc::new(InMemoryBlockstore::new());
        let leaf = store.put(Block::new(&b"leaf"[..])).unwrap();
        let source: Arc<dyn LinkSource> = Arc::new(StoreLinkSource::new(store));
        assert!(source.get_links(&leaf).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn graph_counts_fetches_and_fails_on_demand() {
        let graph = LinkGraph::new();
        let (a, b) = (Cid::raw([1; 32]), Cid::raw([2; 32]));
        graph.link(a, vec![b]);
        graph.fail_on(b);

        assert_eq!(graph.get_links(&a).await.unwrap(), vec![b]);
        assert!(graph.get_links(&b).await.is_err());
        assert_eq!(graph.fetch_count(&a), 1);
        assert_eq!(graph.fetch_count(&b), 1);
        assert_eq!(graph.len(), 1);
    }
}
