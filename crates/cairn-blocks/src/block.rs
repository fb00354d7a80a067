use std::fmt;

use bytes::Bytes;
use cairn_crypto::ContentHasher;
use cairn_types::{Cid, Codec};

use crate::error::{BlockError, BlockResult};

/// Whether [`Block::new_with_cid`] recomputes the digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verification {
    /// Recompute and compare. Use for anything read from the network or disk.
    #[default]
    Verify,
    /// Accept the claimed identifier as-is. Only for data this node just
    /// hashed itself; a wrong claim produces a block with a wrong identifier.
    Trust,
}

impl Verification {
    /// Map the `verify_block_hashes` configuration switch.
    pub fn from_config(verify: bool) -> Self {
        if verify {
            Self::Verify
        } else {
            Self::Trust
        }
    }
}

/// An immutable payload and its content identifier.
///
/// Cloning a block is cheap: the payload is reference-counted.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Bytes,
}

impl Block {
    /// Hash `data` and wrap it as a raw block. Never fails.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self::with_codec(Codec::Raw, data)
    }

    /// Hash `data` and wrap it as a block interpreted with `codec`.
    pub fn with_codec(codec: Codec, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let cid = ContentHasher::default().cid(codec, &data);
        Self { cid, data }
    }

    /// Wrap `data` under an identifier the caller already knows.
    ///
    /// With [`Verification::Verify`] the digest is recomputed using the hash
    /// code recorded in `cid`, and a disagreement fails with
    /// [`BlockError::IntegrityMismatch`].
    pub fn new_with_cid(
        data: impl Into<Bytes>,
        cid: Cid,
        verification: Verification,
    ) -> BlockResult<Self> {
        let data = data.into();
        if verification == Verification::Verify {
            let computed = ContentHasher::for_cid(&cid).cid(cid.codec(), &data);
            if computed != cid {
                return Err(BlockError::IntegrityMismatch {
                    expected: cid,
                    computed,
                });
            }
        }
        Ok(Self { cid, data })
    }

    pub fn cid(&self) -> Cid {
        self.cid
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Recompute the digest and compare it with the block's identifier.
    pub fn verify(&self) -> bool {
        ContentHasher::for_cid(&self.cid).verify(&self.data, &self.cid)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("cid", &self.cid)
            .field("len", &self.data.len())
            .finish()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Block {}]", self.cid)
    }
}
