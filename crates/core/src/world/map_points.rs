//! Named reference positions on a map (spawns, bombsites)

use crate::core_types::error::{Result, SmokeError};
use crate::core_types::vec3::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side a spawn point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    /// Terrorists
    T,
    /// Counter-terrorists
    Ct,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::T => write!(f, "T"),
            Team::Ct => write!(f, "CT"),
        }
    }
}

impl FromStr for Team {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "T" => Ok(Team::T),
            "CT" => Ok(Team::Ct),
            other => Err(SmokeError::invalid_input(format!("unknown team '{other}'"))),
        }
    }
}

/// Spawn and bombsite positions in game space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPoints {
    /// Spawn positions per team
    pub spawns: FxHashMap<Team, Vec<Vec3>>,
    /// Bombsite centers keyed by site letter
    pub bombsites: FxHashMap<String, Vec3>,
}

impl MapPoints {
    /// Reference points for the built-in test map
    pub fn test_map() -> Self {
        let mut spawns = FxHashMap::default();
        spawns.insert(
            Team::T,
            vec![Vec3::new(256.0, 640.0, 16.0), Vec3::new(300.0, 600.0, 16.0)],
        );
        spawns.insert(
            Team::Ct,
            vec![Vec3::new(768.0, 640.0, 16.0), Vec3::new(800.0, 600.0, 16.0)],
        );

        let mut bombsites = FxHashMap::default();
        bombsites.insert("A".to_string(), Vec3::new(500.0, 500.0, 16.0));
        bombsites.insert("B".to_string(), Vec3::new(700.0, 700.0, 16.0));

        Self { spawns, bombsites }
    }

    /// Spawn positions for one team (empty if unknown)
    pub fn spawns(&self, team: Team) -> &[Vec3] {
        self.spawns.get(&team).map_or(&[], Vec::as_slice)
    }

    /// Bombsite center by letter, case-insensitive
    pub fn bombsite(&self, site: &str) -> Option<Vec3> {
        self.bombsites.get(&site.to_ascii_uppercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_map_points() {
        let points = MapPoints::test_map();
        assert_eq!(points.spawns(Team::T).len(), 2);
        assert_eq!(points.spawns(Team::Ct)[0], Vec3::new(768.0, 640.0, 16.0));
        assert_eq!(points.bombsite("a"), Some(Vec3::new(500.0, 500.0, 16.0)));
        assert_eq!(points.bombsite("C"), None);
    }

    #[test]
    fn test_team_parsing() {
        assert_eq!("ct".parse::<Team>().unwrap(), Team::Ct);
        assert_eq!(Team::Ct.to_string(), "CT");
        assert!("spectator".parse::<Team>().unwrap_err().is_invalid_input());
    }
}
