//! Pin registry for Cairn.
//!
//! Pins protect content from garbage collection and define what a node
//! reprovides under the pinned strategies.
//!
//! # Architecture
//!
//! - **Direct pins** protect a single block. Its links are never followed.
//! - **Recursive pins** protect a root and everything reachable from it, up
//!   to the pin's [`MaxDepth`].
//!
//! Readers take snapshots: the lists returned by [`Pinner`] do not change
//! while a walk is using them.
//!
//! # Modules
//!
//! - [`error`]: Error types for pin operations
//! - [`types`]: [`PinMode`], [`Pin`], [`RecursivePin`]
//! - [`traits`]: The [`Pinner`] trait consumed by key providers
//! - [`memory`]: In-memory [`InMemoryPinner`] for tests and embedding

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use cairn_dag::MaxDepth;
pub use error::{PinError, Result};
pub use memory::InMemoryPinner;
pub use traits::Pinner;
pub use types::{Pin, PinMode, RecursivePin};
