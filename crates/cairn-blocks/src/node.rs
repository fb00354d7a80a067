use serde::{Deserialize, Serialize};

use cairn_types::{Cid, Codec};

use crate::block::Block;
use crate::error::{BlockError, BlockResult};

/// A link-carrying DAG node.
///
/// Encoded with bincode into a block whose codec is [`Codec::DagNode`].
/// Link order is preserved and is the order walkers descend in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagNode {
    pub links: Vec<Cid>,
    pub data: Vec<u8>,
}

impl DagNode {
    pub fn new(links: Vec<Cid>, data: Vec<u8>) -> Self {
        Self { links, data }
    }

    /// A node with links and no data of its own.
    pub fn with_links(links: Vec<Cid>) -> Self {
        Self::new(links, Vec::new())
    }

    /// Encode into a freshly hashed block.
    pub fn to_block(&self) -> BlockResult<Block> {
        let bytes = bincode::serialize(self).map_err(|e| BlockError::Encode(e.to_string()))?;
        Ok(Block::with_codec(Codec::DagNode, bytes))
    }

    /// Decode a node block.
    pub fn from_block(block: &Block) -> BlockResult<Self> {
        if block.cid().codec() != Codec::DagNode {
            return Err(BlockError::Decode {
                cid: block.cid(),
                reason: format!("expected dag-node, got {}", block.cid().codec()),
            });
        }
        bincode::deserialize(block.data()).map_err(|e| BlockError::Decode {
            cid: block.cid(),
            reason: e.to_string(),
        })
    }
}

/// The ordered child links of `block`. Raw blocks are leaves.
pub fn links_of(block: &Block) -> BlockResult<Vec<Cid>> {
    match block.cid().codec() {
        Codec::Raw => Ok(Vec::new()),
        Codec::DagNode => Ok(DagNode::from_block(block)?.links),
    }
}
