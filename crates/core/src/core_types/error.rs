//! Error taxonomy for the smoke finder.
//!
//! - `InvalidInput`: rejected before any simulation work begins (bad vector
//!   dimensionality, non-positive time budget, unknown enum name).
//! - `SimulationFailure`: an operation inside the collision world failed.
//!   A single `simulate_throw` call propagates it; the position search drops
//!   the candidate and carries on.
//! - `SceneLoad`: static geometry could not be read or parsed.
//!
//! An empty search result is not an error.

use crate::world::WorldError;
use thiserror::Error;

/// Errors produced by the smoke finder core.
#[derive(Debug, Error)]
pub enum SmokeError {
    /// Caller supplied a value the system cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The collision world failed while simulating a throw.
    #[error("simulation failure: {0}")]
    SimulationFailure(#[from] WorldError),

    /// Map geometry could not be loaded.
    #[error("failed to load scene: {0}")]
    SceneLoad(String),
}

impl SmokeError {
    /// Shorthand for [`SmokeError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for [`SmokeError::SceneLoad`].
    pub fn scene_load(message: impl Into<String>) -> Self {
        Self::SceneLoad(message.into())
    }

    /// Whether this error was raised by input validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SmokeError>;
