//! Ranked search results and their console commands

use crate::core_types::throw_type::ThrowType;
use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// View angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    /// Up from horizontal
    pub pitch: f32,
    /// Counter-clockwise from east
    pub yaw: f32,
}

/// Console commands that put a player at a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleCommands {
    /// `setpos x y z`
    pub setpos: String,
    /// `setang pitch yaw 0`
    pub setang: String,
    /// Both, joined with `"; "`
    pub combined: String,
}

impl ConsoleCommands {
    /// Format the commands with one decimal place
    pub fn new(position: &Vec3, angles: Angles) -> Self {
        let setpos = format!(
            "setpos {:.1} {:.1} {:.1}",
            position.x, position.y, position.z
        );
        let setang = format!("setang {:.1} {:.1} 0", angles.pitch, angles.yaw);
        let combined = format!("{setpos}; {setang}");
        Self {
            setpos,
            setang,
            combined,
        }
    }
}

/// One throw that lands close enough to the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeSolution {
    /// Where the player stands (game space, eye height)
    pub throw_position: Vec3,
    /// View angles at release
    pub angles: Angles,
    /// Throw strength
    pub throw_type: ThrowType,
    /// Requested landing point
    pub target_position: Vec3,
    /// Simulated landing point
    pub landing_position: Vec3,
    /// Distance between landing and target (units)
    pub accuracy: f32,
    /// Every n-th frame of the flight
    pub trajectory: Vec<Vec3>,
    /// Bounce estimate
    pub bounces: u32,
    /// Ready-to-paste console commands
    pub cs2_commands: ConsoleCommands,
}

impl SmokeSolution {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        throw_position: Vec3,
        angles: Angles,
        throw_type: ThrowType,
        target_position: Vec3,
        landing_position: Vec3,
        accuracy: f32,
        trajectory: Vec<Vec3>,
        bounces: u32,
    ) -> Self {
        let cs2_commands = ConsoleCommands::new(&throw_position, angles);
        Self {
            throw_position,
            angles,
            throw_type,
            target_position,
            landing_position,
            accuracy,
            trajectory,
            bounces,
            cs2_commands,
        }
    }
}

/// Keep frames 0, n, 2n, ...
pub(crate) fn decimate(trajectory: &[Vec3], every: usize) -> Vec<Vec3> {
    trajectory.iter().step_by(every.max(1)).copied().collect()
}
