use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How much of the organisation hierarchy a principal may see.
///
/// Variants are declared from least to most permissive; [`DataScope::rank`]
/// exposes that order as a number so callers never rely on discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataScope {
    /// Only rows owned by the principal.
    #[default]
    #[serde(rename = "SELF")]
    SelfOnly,
    /// Rows of the principal's own org unit.
    UnitOnly,
    /// Rows of the principal's org unit and every unit below it.
    UnitAndChild,
    /// Rows of an explicitly selected set of units.
    SelectedUnits,
    /// Everything inside the tenant (or the platform, for platform admins).
    All,
}

impl DataScope {
    pub const VARIANTS: [DataScope; 5] = [
        DataScope::SelfOnly,
        DataScope::UnitOnly,
        DataScope::UnitAndChild,
        DataScope::SelectedUnits,
        DataScope::All,
    ];

    /// Priority used when several roles contribute a scope. Higher wins.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            DataScope::SelfOnly => 1,
            DataScope::UnitOnly => 2,
            DataScope::UnitAndChild => 3,
            DataScope::SelectedUnits => 4,
            DataScope::All => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DataScope::SelfOnly => "SELF",
            DataScope::UnitOnly => "UNIT_ONLY",
            DataScope::UnitAndChild => "UNIT_AND_CHILD",
            DataScope::SelectedUnits => "SELECTED_UNITS",
            DataScope::All => "ALL",
        }
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized data scope: {0}")]
pub struct ParseDataScopeError(pub String);

impl FromStr for DataScope {
    type Err = ParseDataScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataScope::VARIANTS
            .into_iter()
            .find(|ds| ds.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseDataScopeError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_increasing() {
        let ranks: Vec<u8> = DataScope::VARIANTS.iter().map(|d| d.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("SELF".parse::<DataScope>().unwrap(), DataScope::SelfOnly);
        assert_eq!(
            "unit_and_child".parse::<DataScope>().unwrap(),
            DataScope::UnitAndChild
        );
        assert!("DATA_SCOPE_UNSPECIFIED".parse::<DataScope>().is_err());
    }

    #[test]
    fn json_uses_screaming_names() {
        assert_eq!(
            serde_json::to_string(&DataScope::SelfOnly).unwrap(),
            "\"SELF\""
        );
        assert_eq!(
            serde_json::to_string(&DataScope::SelectedUnits).unwrap(),
            "\"SELECTED_UNITS\""
        );
        let back: DataScope = serde_json::from_str("\"ALL\"").unwrap();
        assert_eq!(back, DataScope::All);
    }
}
