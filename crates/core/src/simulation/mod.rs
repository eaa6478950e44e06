//! Throw simulation and the context it runs in

mod context;
mod trajectory;

pub use context::{SimulationContext, LINE_OF_SIGHT_CLEAR};
pub use trajectory::{resample_trajectory, simulate_throw, SimulationResult, TrajectoryMetrics};
