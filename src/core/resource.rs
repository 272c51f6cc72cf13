//! Counted player resources.

use serde::{Deserialize, Serialize};

/// A counted player resource. Counts never go negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    Mana,
    Spirits,
    Memory,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Resource::Mana => "MANA",
            Resource::Spirits => "SPIRITS",
            Resource::Memory => "MEMORY",
        })
    }
}

/// Numeric comparison used by conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparison {
    AtLeast,
    AtMost,
    Exactly,
}

impl Comparison {
    /// Compare `value` against `target`.
    #[must_use]
    pub fn holds(self, value: u64, target: u64) -> bool {
        match self {
            Comparison::AtLeast => value >= target,
            Comparison::AtMost => value <= target,
            Comparison::Exactly => value == target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison() {
        assert!(Comparison::AtLeast.holds(3, 3));
        assert!(!Comparison::AtLeast.holds(2, 3));
        assert!(Comparison::AtMost.holds(0, 3));
        assert!(Comparison::Exactly.holds(4, 4));
        assert!(!Comparison::Exactly.holds(5, 4));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Resource::Spirits).unwrap(), "\"SPIRITS\"");
        let cmp: Comparison = serde_json::from_str("\"AT_MOST\"").unwrap();
        assert_eq!(cmp, Comparison::AtMost);
    }
}
