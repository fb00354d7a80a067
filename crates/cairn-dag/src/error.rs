//! Error types for DAG traversal.

use cairn_types::{Cancelled, Cid};

/// Errors that can occur while walking a DAG.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// The link source could not produce a node's children.
    #[error("cannot resolve links of {cid:?}: {reason}")]
    LinkResolution {
        /// The node whose links were requested.
        cid: Cid,
        /// What the link source reported.
        reason: String,
    },

    /// The walk was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// The receiving side of a streaming set was dropped.
    #[error("identifier consumer went away")]
    ConsumerGone,
}

impl DagError {
    /// Returns `true` for cancellation, as opposed to a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
