use cairn_types::{Cancelled, Cid};

/// Errors from block construction and block storage.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The payload does not hash to the claimed identifier.
    #[error("integrity mismatch: expected {expected:?}, computed {computed:?}")]
    IntegrityMismatch { expected: Cid, computed: Cid },

    /// The requested block was not found.
    #[error("block not found: {0:?}")]
    NotFound(Cid),

    /// The block payload could not be decoded as the requested type.
    #[error("cannot decode block {cid:?}: {reason}")]
    Decode { cid: Cid, reason: String },

    /// Node encoding failed.
    #[error("cannot encode node: {0}")]
    Encode(String),

    /// Enumeration was cancelled before it started.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Result alias for block operations.
pub type BlockResult<T> = Result<T, BlockError>;
