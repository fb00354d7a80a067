//! Content-addressed blocks and block storage for Cairn.
//!
//! A [`Block`] is an immutable payload paired with the [`Cid`] derived from
//! its bytes. Blocks with the [`Codec::DagNode`] codec carry a [`DagNode`]:
//! an ordered list of child links plus opaque data, which is what turns a
//! store full of blocks into a merkle DAG.
//!
//! # Storage Backends
//!
//! All backends implement the [`Blockstore`] trait:
//!
//! - [`InMemoryBlockstore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Blocks are immutable once constructed.
//! 2. Untrusted input is verified on construction; trusted paths may opt out.
//! 3. The store holds each identifier at most once.
//! 4. Enumeration streams keys through a bounded channel and honors cancellation.
//!
//! [`Cid`]: cairn_types::Cid
//! [`Codec::DagNode`]: cairn_types::Codec::DagNode

pub mod block;
pub mod error;
pub mod memory;
pub mod node;
pub mod store;

pub use block::{Block, Verification};
pub use error::{BlockError, BlockResult};
pub use memory::InMemoryBlockstore;
pub use node::{links_of, DagNode};
pub use store::Blockstore;
