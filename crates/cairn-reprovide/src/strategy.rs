use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProvideError;

/// Which identifiers a node announces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Strategy {
    /// Every block in the blockstore.
    #[default]
    All,
    /// Pinned roots and everything recursive pins reach.
    Pinned,
    /// Pinned roots only.
    Roots,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pinned => "pinned",
            Self::Roots => "roots",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ProvideError;

    /// An empty string selects [`Strategy::All`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "pinned" => Ok(Self::Pinned),
            "roots" => Ok(Self::Roots),
            other => Err(ProvideError::UnknownStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = ProvideError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    #[test]
    fn parses_known_names() {
        assert_eq!("all".parse::<Strategy>().unwrap(), Strategy::All);
        assert_eq!("pinned".parse::<Strategy>().unwrap(), Strategy::Pinned);
        assert_eq!("roots".parse::<Strategy>().unwrap(), Strategy::Roots);
    }

    #[test]
    fn empty_means_all() {
        assert_eq!("".parse::<Strategy>().unwrap(), Strategy::All);
        assert_eq!(Strategy::default(), Strategy::All);
    }

    #[test]
    fn rejects_unknown_names() {
        for bad in ["ALL", "Pinned", "root", " all", "everything"] {
            let err = bad.parse::<Strategy>().unwrap_err();
            assert!(matches!(err, ProvideError::UnknownStrategy(ref s) if s == bad));
        }
    }

    #[test]
    fn display_matches_parse() {
        for s in [Strategy::All, Strategy::Pinned, Strategy::Roots] {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
    }

    proptest! {
        #[test]
        fn only_known_names_parse(s in "[a-z]{0,8}") {
            let known = matches!(s.as_str(), "" | "all" | "pinned" | "roots");
            prop_assert_eq!(s.parse::<Strategy>().is_ok(), known);
        }
    }
}
