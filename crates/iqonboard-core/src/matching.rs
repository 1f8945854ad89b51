use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a desired organization or category name is compared with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Names must be identical.
    #[default]
    Exact,
    /// An existing name matches when it contains the desired name.
    /// `"security"` matches `"security-tag"`, so unrelated entities can collide.
    Containment,
}

impl MatchMode {
    pub fn matches(self, existing: &str, wanted: &str) -> bool {
        match self {
            Self::Exact => existing == wanted,
            Self::Containment => existing.contains(wanted),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Containment => "containment",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "containment" | "contains" => Ok(Self::Containment),
            other => Err(format!(
                "Unknown match mode: {other}. Valid modes: exact, containment"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_equality() {
        assert!(MatchMode::Exact.matches("security", "security"));
        assert!(!MatchMode::Exact.matches("security-tag", "security"));
    }

    #[test]
    fn containment_matches_substrings() {
        assert!(MatchMode::Containment.matches("security-tag", "security"));
        assert!(MatchMode::Containment.matches("security", "security"));
        assert!(!MatchMode::Containment.matches("sec", "security"));
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("Exact".parse::<MatchMode>(), Ok(MatchMode::Exact));
        assert_eq!("containment".parse::<MatchMode>(), Ok(MatchMode::Containment));
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
