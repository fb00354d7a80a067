//! Reproviding for Cairn.
//!
//! A node stays discoverable by periodically announcing the identifiers it
//! holds. This crate decides *which* identifiers those are and feeds them to
//! the routing layer as they are found.
//!
//! # Architecture
//!
//! - [`KeyProvider`] starts an enumeration and returns a [`KeyStream`] at
//!   once; a background task fills it through a one-slot channel, so the
//!   producer never runs more than one identifier ahead of the announcer.
//! - [`BlockstoreProvider`] streams every stored key.
//! - [`PinnedProvider`] streams pinned roots and what recursive pins reach,
//!   each identifier once per call, with the walk error (if any) reported by
//!   [`KeyStream::finish`].
//! - [`Reprovider`] drains a provider into [`ContentRouting`] on an interval.
//!
//! # Modules
//!
//! - [`error`]: [`ProvideError`] and [`ProvideResult`]
//! - [`provider`]: Key providers and [`KeyStream`]
//! - [`strategy`]: [`Strategy`] selection
//! - [`config`]: [`ReprovideConfig`], loaded from TOML
//! - [`reprovider`]: The announce loop

pub mod config;
pub mod error;
pub mod provider;
pub mod reprovider;
pub mod strategy;

pub use config::{ReprovideConfig, DEFAULT_INTERVAL};
pub use error::{ProvideError, ProvideResult};
pub use provider::{BlockstoreProvider, KeyProvider, KeyStream, PinnedProvider};
pub use reprovider::{ContentRouting, ReprovideReport, Reprovider};
pub use strategy::Strategy;
