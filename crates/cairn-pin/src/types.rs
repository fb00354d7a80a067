//! Core pin types.

use std::fmt;

use serde::{Deserialize, Serialize};

use cairn_dag::MaxDepth;
use cairn_types::Cid;

/// How a pin protects its root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinMode {
    /// Only the root itself.
    Direct,
    /// The root and its descendants up to a depth.
    Recursive(MaxDepth),
}

impl PinMode {
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct)
    }

    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Recursive(_))
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Recursive(depth) if depth.is_unbounded() => write!(f, "recursive"),
            Self::Recursive(depth) => write!(f, "recursive (depth {depth})"),
        }
    }
}

/// A pinned root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pin {
    pub cid: Cid,
    pub mode: PinMode,
}

/// A recursive pin as handed to walkers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecursivePin {
    pub cid: Cid,
    pub max_depth: MaxDepth,
}

impl RecursivePin {
    pub fn new(cid: Cid, max_depth: MaxDepth) -> Self {
        Self { cid, max_depth }
    }

    /// A pin that follows every descendant.
    pub fn unbounded(cid: Cid) -> Self {
        Self::new(cid, MaxDepth::UNBOUNDED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display() {
        assert_eq!(PinMode::Direct.to_string(), "direct");
        assert_eq!(
            PinMode::Recursive(MaxDepth::UNBOUNDED).to_string(),
            "recursive"
        );
        assert_eq!(
            PinMode::Recursive(MaxDepth::levels(3)).to_string(),
            "recursive (depth 3)"
        );
    }

    #[test]
    fn mode_predicates() {
        assert!(PinMode::Direct.is_direct());
        assert!(PinMode::Recursive(MaxDepth::levels(1)).is_recursive());
    }

    #[test]
    fn recursive_pin_serializes_depth_as_raw() {
        let pin = RecursivePin::unbounded(Cid::raw([1; 32]));
        let json = serde_json::to_value(pin).unwrap();
        assert_eq!(json["max_depth"], -1);
    }
}
