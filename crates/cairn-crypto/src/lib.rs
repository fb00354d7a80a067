//! Content hashing for Cairn.
//!
//! Computes and checks the digests that content identifiers are built from.
//! Hashing wraps established libraries; there is no custom cryptography.

pub mod hasher;

pub use hasher::ContentHasher;
