//! Merkle DAG traversal for Cairn.
//!
//! Enumerates the content identifiers reachable from a root by repeatedly
//! asking a [`LinkSource`] for a node's children. A [`Visitor`] decides
//! whether each discovered identifier is new; returning `false` prunes the
//! branch, which keeps shared sub-DAGs from being expanded twice and stops
//! cycles in malformed graphs.
//!
//! [`StreamingSet`] is what key providers walk with: it forwards every
//! first-time identifier through a bounded channel while the walk is still
//! running, and keeps an [`ExpansionRecord`] so a node reported early (a
//! direct pin, or a node at a depth limit) is still expanded by a later walk
//! that reaches it with depth to spare.

pub mod depth;
pub mod error;
pub mod links;
pub mod set;
pub mod streaming;
pub mod walk;

pub use depth::MaxDepth;
pub use error::{DagError, DagResult};
pub use links::{LinkGraph, LinkSource, StoreLinkSource};
pub use set::{CidSet, ExpansionRecord};
pub use streaming::{StreamingSet, StreamingWalk};
pub use walk::{enumerate_children, enumerate_children_with_stats, Visitor, WalkStats};
