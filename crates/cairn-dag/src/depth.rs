use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// How far below its root a walk may descend.
///
/// A raw depth of `0` (or any negative value) means **unbounded**, not "root
/// only". Pin registries store `0`/`-1` for "follow every descendant", and
/// that convention is kept here so a stored recursive pin never silently
/// shrinks to its root.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct MaxDepth(Option<NonZeroU32>);

impl MaxDepth {
    /// Follow all descendants.
    pub const UNBOUNDED: Self = Self(None);

    /// At most `n` levels below the root; `0` means unbounded.
    pub fn levels(n: u32) -> Self {
        Self(NonZeroU32::new(n))
    }

    /// Interpret a stored depth: `<= 0` is unbounded.
    pub fn from_raw(raw: i64) -> Self {
        if raw <= 0 {
            Self::UNBOUNDED
        } else {
            Self::levels(u32::try_from(raw).unwrap_or(u32::MAX))
        }
    }

    /// The stored form: `-1` for unbounded.
    pub fn to_raw(self) -> i64 {
        self.0.map_or(-1, |n| i64::from(n.get()))
    }

    pub fn is_unbounded(self) -> bool {
        self.0.is_none()
    }

    /// The level limit, if any.
    pub fn limit(self) -> Option<u32> {
        self.0.map(NonZeroU32::get)
    }

    /// Whether a node at `depth` (root = 0) may have its links fetched.
    pub fn allows_expansion(self, depth: u32) -> bool {
        match self.0 {
            None => true,
            Some(limit) => depth < limit.get(),
        }
    }

    /// Levels still open below a node at `depth`; `None` is unbounded.
    ///
    /// A node with `Some(0)` is reported but not expanded.
    pub fn remaining(self, depth: u32) -> Option<u32> {
        self.0.map(|limit| limit.get().saturating_sub(depth))
    }
}

impl From<i64> for MaxDepth {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<MaxDepth> for i64 {
    fn from(depth: MaxDepth) -> Self {
        depth.to_raw()
    }
}

impl fmt::Debug for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "MaxDepth(unbounded)"),
            Some(n) => write!(f, "MaxDepth({n})"),
        }
    }
}

impl fmt::Display for MaxDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "unbounded"),
            Some(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_are_unbounded() {
        assert!(MaxDepth::levels(0).is_unbounded());
        assert!(MaxDepth::from_raw(0).is_unbounded());
        assert!(MaxDepth::from_raw(-1).is_unbounded());
        assert_eq!(MaxDepth::default(), MaxDepth::UNBOUNDED);
    }

    #[test]
    fn positive_depth_bounds_expansion() {
        let depth = MaxDepth::levels(2);
        assert_eq!(depth.limit(), Some(2));
        assert!(depth.allows_expansion(0));
        assert!(depth.allows_expansion(1));
        assert!(!depth.allows_expansion(2));
    }

    #[test]
    fn unbounded_always_expands() {
        assert!(MaxDepth::UNBOUNDED.allows_expansion(u32::MAX));
    }

    #[test]
    fn raw_form() {
        assert_eq!(MaxDepth::UNBOUNDED.to_raw(), -1);
        assert_eq!(MaxDepth::levels(5).to_raw(), 5);
        assert_eq!(MaxDepth::from_raw(i64::MAX).limit(), Some(u32::MAX));
    }

    #[test]
    fn remaining_levels() {
        let depth = MaxDepth::levels(3);
        assert_eq!(depth.remaining(0), Some(3));
        assert_eq!(depth.remaining(3), Some(0));
        assert_eq!(depth.remaining(7), Some(0));
        assert_eq!(MaxDepth::UNBOUNDED.remaining(40), None);
    }

    #[test]
    fn serde_uses_raw_form() {
        assert_eq!(serde_json::to_string(&MaxDepth::UNBOUNDED).unwrap(), "-1");
        let parsed: MaxDepth = serde_json::from_str("0").unwrap();
        assert!(parsed.is_unbounded());
        let parsed: MaxDepth = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, MaxDepth::levels(3));
    }

    #[test]
    fn display() {
        assert_eq!(MaxDepth::UNBOUNDED.to_string(), "unbounded");
        assert_eq!(MaxDepth::levels(4).to_string(), "4");
    }
}
