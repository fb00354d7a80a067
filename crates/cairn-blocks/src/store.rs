use cairn_types::{CancellationToken, Cid};
use tokio::sync::mpsc;

use crate::block::Block;
use crate::error::BlockResult;

/// Content-addressed block store.
///
/// All implementations must satisfy these invariants:
/// - Each identifier is held at most once; `put` of an existing block is a no-op.
/// - Concurrent reads are always safe (blocks are immutable).
/// - All I/O errors are propagated, never silently ignored.
pub trait Blockstore: Send + Sync {
    /// Read a block by identifier.
    ///
    /// Returns `Ok(None)` if the block does not exist.
    fn get(&self, cid: &Cid) -> BlockResult<Option<Block>>;

    /// Store a block and return its identifier. Idempotent.
    fn put(&self, block: Block) -> BlockResult<Cid>;

    /// Check whether a block exists in the store.
    fn has(&self, cid: &Cid) -> BlockResult<bool>;

    /// Delete a block. Returns `true` if the block existed.
    fn delete(&self, cid: &Cid) -> BlockResult<bool>;

    /// Enumerate every identifier in the store.
    ///
    /// Keys are streamed through the returned channel by a background task.
    /// The channel closes when enumeration completes or `cancel` fires.
    /// Must be called from within a tokio runtime.
    fn all_keys_chan(&self, cancel: CancellationToken) -> BlockResult<mpsc::Receiver<Cid>>;

    /// Store several blocks and return their identifiers.
    ///
    /// Default implementation calls `put()` for each block.
    fn put_many(&self, blocks: Vec<Block>) -> BlockResult<Vec<Cid>> {
        blocks.into_iter().map(|b| self.put(b)).collect()
    }
}
