//! Grenade throw strengths.

use crate::core_types::error::{Result, SmokeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard the grenade is thrown.
///
/// Each variant maps to a fixed launch speed in `PhysicsConfig`. The legacy
/// mouse-button names used by the web client are accepted when parsing:
///
/// | Variant  | Input        | Legacy name   |
/// |----------|--------------|---------------|
/// | `Strong` | left click   | `LEFT_CLICK`  |
/// | `Medium` | both buttons | `BOTH_CLICKS` |
/// | `Weak`   | right click  | `RIGHT_CLICK` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThrowType {
    /// Full-strength overhand throw
    #[default]
    #[serde(alias = "LEFT_CLICK")]
    Strong,
    /// Jump/medium throw
    #[serde(alias = "BOTH_CLICKS")]
    Medium,
    /// Underhand lob
    #[serde(alias = "RIGHT_CLICK")]
    Weak,
}

impl ThrowType {
    /// All throw types, strongest first
    pub const ALL: [ThrowType; 3] = [ThrowType::Strong, ThrowType::Medium, ThrowType::Weak];

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ThrowType::Strong => "STRONG",
            ThrowType::Medium => "MEDIUM",
            ThrowType::Weak => "WEAK",
        }
    }
}

impl fmt::Display for ThrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThrowType {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "STRONG" | "LEFT_CLICK" => Ok(ThrowType::Strong),
            "MEDIUM" | "BOTH_CLICKS" => Ok(ThrowType::Medium),
            "WEAK" | "RIGHT_CLICK" => Ok(ThrowType::Weak),
            other => Err(SmokeError::invalid_input(format!(
                "unknown throw type '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_legacy_names() {
        assert_eq!("strong".parse::<ThrowType>().unwrap(), ThrowType::Strong);
        assert_eq!("LEFT_CLICK".parse::<ThrowType>().unwrap(), ThrowType::Strong);
        assert_eq!("both-clicks".parse::<ThrowType>().unwrap(), ThrowType::Medium);
        assert_eq!("RIGHT_CLICK".parse::<ThrowType>().unwrap(), ThrowType::Weak);
    }

    #[test]
    fn test_parse_unknown_is_invalid_input() {
        let err = "MIDDLE_CLICK".parse::<ThrowType>().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_serde_accepts_legacy_alias() {
        let t: ThrowType = serde_json::from_str("\"BOTH_CLICKS\"").unwrap();
        assert_eq!(t, ThrowType::Medium);
        assert_eq!(serde_json::to_string(&ThrowType::Weak).unwrap(), "\"WEAK\"");
    }
}
