//! Search strategy selection

use crate::core_types::error::{Result, SmokeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How candidate throws are generated.
///
/// Only the grid sweep exists as an algorithm. `Genetic` and `Hybrid` are
/// accepted for client compatibility and run the grid sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStrategy {
    /// Exhaustive position × pitch sweep
    #[default]
    #[serde(alias = "GRID_SEARCH")]
    Grid,
    /// Alias of `Grid`
    Genetic,
    /// Alias of `Grid`
    Hybrid,
}

impl SearchStrategy {
    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Grid => "GRID",
            SearchStrategy::Genetic => "GENETIC",
            SearchStrategy::Hybrid => "HYBRID",
        }
    }

    /// Whether this strategy runs a different algorithm than its name says
    pub fn is_grid_alias(&self) -> bool {
        !matches!(self, SearchStrategy::Grid)
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStrategy {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "GRID" | "GRID_SEARCH" => Ok(SearchStrategy::Grid),
            "GENETIC" => Ok(SearchStrategy::Genetic),
            "HYBRID" => Ok(SearchStrategy::Hybrid),
            other => Err(SmokeError::invalid_input(format!(
                "unknown search strategy '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("grid_search".parse::<SearchStrategy>().unwrap(), SearchStrategy::Grid);
        assert_eq!("GENETIC".parse::<SearchStrategy>().unwrap(), SearchStrategy::Genetic);
        assert!("annealing".parse::<SearchStrategy>().unwrap_err().is_invalid_input());
        assert!(SearchStrategy::Hybrid.is_grid_alias());
    }

    #[test]
    fn test_serde_accepts_legacy_name() {
        let s: SearchStrategy = serde_json::from_str(r#""GRID_SEARCH""#).unwrap();
        assert_eq!(s, SearchStrategy::Grid);
        assert_eq!(serde_json::to_string(&SearchStrategy::Hybrid).unwrap(), r#""HYBRID""#);
    }
}
