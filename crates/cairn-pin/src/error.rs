//! Error types for pin operations.

use cairn_types::Cid;
use thiserror::Error;

/// Errors that can occur during pin operations.
#[derive(Debug, Error)]
pub enum PinError {
    /// The identifier is already pinned in a way that conflicts.
    #[error("{cid:?} is already pinned {mode}")]
    AlreadyPinned { cid: Cid, mode: String },

    /// The identifier is not pinned.
    #[error("not pinned: {0:?}")]
    NotPinned(Cid),

    /// The registry lock was poisoned by a panicking writer.
    #[error("pin registry unavailable: {0}")]
    Poisoned(String),
}

/// Convenience type alias for pin operations.
pub type Result<T> = std::result::Result<T, PinError>;
