//! The [`Pinner`] trait defining the pin registry interface.

use cairn_types::Cid;

use crate::error::Result;
use crate::types::{Pin, PinMode, RecursivePin};

/// Read access to the set of pinned roots.
///
/// Implementations must be thread-safe (`Send + Sync`). Every list method
/// returns a snapshot that does not change while the caller uses it.
pub trait Pinner: Send + Sync {
    /// Roots pinned directly.
    fn direct_keys(&self) -> Result<Vec<Cid>>;

    /// Roots pinned recursively, with their depth bounds.
    fn recursive_pins(&self) -> Result<Vec<RecursivePin>>;

    /// How `cid` is pinned as a root, if at all.
    ///
    /// Only roots are reported; an identifier protected because it is
    /// reachable from a recursive pin returns `None` here.
    fn pin_mode(&self, cid: &Cid) -> Result<Option<PinMode>>;

    /// Whether `cid` is pinned as a root.
    fn is_pinned(&self, cid: &Cid) -> Result<bool> {
        Ok(self.pin_mode(cid)?.is_some())
    }

    /// Every pinned root.
    fn all_pins(&self) -> Result<Vec<Pin>> {
        let mut pins: Vec<Pin> = self
            .direct_keys()?
            .into_iter()
            .map(|cid| Pin {
                cid,
                mode: PinMode::Direct,
            })
            .collect();
        pins.extend(self.recursive_pins()?.into_iter().map(|p| Pin {
            cid: p.cid,
            mode: PinMode::Recursive(p.max_depth),
        }));
        Ok(pins)
    }
}
