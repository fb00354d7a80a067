//! In-memory pin registry for testing and ephemeral use.
//!
//! [`InMemoryPinner`] keeps every pinned root in a `HashMap` protected by a
//! `RwLock`. Snapshots are sorted so walks over them are deterministic.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use cairn_dag::MaxDepth;
use cairn_types::Cid;

use crate::error::{PinError, Result};
use crate::traits::Pinner;
use crate::types::{PinMode, RecursivePin};

/// An in-memory implementation of [`Pinner`].
#[derive(Debug, Default)]
pub struct InMemoryPinner {
    pins: RwLock<HashMap<Cid, PinMode>>,
}

impl InMemoryPinner {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `cid` directly.
    ///
    /// Fails if `cid` is already pinned recursively, since that pin already
    /// protects it and downgrading would silently drop its descendants.
    pub fn pin_direct(&self, cid: Cid) -> Result<()> {
        let mut pins = self.write()?;
        if let Some(mode @ PinMode::Recursive(_)) = pins.get(&cid) {
            return Err(PinError::AlreadyPinned {
                cid,
                mode: mode.to_string(),
            });
        }
        pins.insert(cid, PinMode::Direct);
        debug!(cid = %cid.short_hex(), "pinned direct");
        Ok(())
    }

    /// Pin `cid` recursively up to `max_depth`.
    ///
    /// Replaces a direct pin or an earlier recursive pin on the same root.
    pub fn pin_recursive(&self, cid: Cid, max_depth: MaxDepth) -> Result<()> {
        let mut pins = self.write()?;
        pins.insert(cid, PinMode::Recursive(max_depth));
        debug!(cid = %cid.short_hex(), %max_depth, "pinned recursive");
        Ok(())
    }

    /// Remove the pin on `cid`, returning how it was pinned.
    pub fn unpin(&self, cid: &Cid) -> Result<PinMode> {
        let mut pins = self.write()?;
        pins.remove(cid).ok_or(PinError::NotPinned(*cid))
    }

    /// Number of pinned roots.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Cid, PinMode>>> {
        self.pins
            .read()
            .map_err(|e| PinError::Poisoned(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Cid, PinMode>>> {
        self.pins
            .write()
            .map_err(|e| PinError::Poisoned(format!("lock poisoned: {e}")))
    }
}

impl Pinner for InMemoryPinner {
    fn direct_keys(&self) -> Result<Vec<Cid>> {
        let pins = self.read()?;
        let mut keys: Vec<Cid> = pins
            .iter()
            .filter(|(_, mode)| mode.is_direct())
            .map(|(cid, _)| *cid)
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn recursive_pins(&self) -> Result<Vec<RecursivePin>> {
        let pins = self.read()?;
        let mut result: Vec<RecursivePin> = pins
            .iter()
            .filter_map(|(cid, mode)| match mode {
                PinMode::Recursive(depth) => Some(RecursivePin::new(*cid, *depth)),
                PinMode::Direct => None,
            })
            .collect();
        result.sort_by_key(|p| p.cid);
        Ok(result)
    }

    fn pin_mode(&self, cid: &Cid) -> Result<Option<PinMode>> {
        let pins = self.read()?;
        Ok(pins.get(cid).copied())
    }
}
