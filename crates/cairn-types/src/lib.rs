//! Foundation types for Cairn.
//!
//! This crate provides the identifier and cancellation primitives shared by
//! every other Cairn crate.
//!
//! # Key Types
//!
//! - [`Cid`]: Content identifier: codec tag + hash tag + digest
//! - [`Codec`]: How a block's payload is interpreted (raw bytes or a DAG node)
//! - [`HashCode`]: Which hash function produced a digest
//! - [`cancel::or_cancel`]: Races a blocking step against a [`CancellationToken`]
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod cancel;
pub mod cid;
pub mod error;

pub use cancel::{or_cancel, Cancelled};
pub use cid::{Cid, Codec, HashCode, CID_LEN, DIGEST_LEN};
pub use error::TypeError;

pub use tokio_util::sync::CancellationToken;
