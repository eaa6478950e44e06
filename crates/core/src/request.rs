//! JSON-shaped request/response surface
//!
//! Mirrors what a web client sends: loosely typed fields (strings for enum
//! names, a plain list for the target) that are validated here and turned
//! into a search. Every failure is reported inside the response body; this
//! layer never panics or returns `Err`.

use crate::core_types::error::{Result, SmokeError};
use crate::core_types::throw_type::ThrowType;
use crate::core_types::vec3::{vec3_from_slice, Vec3};
use crate::search::{SearchStrategy, SmokeSolution};
use crate::simulation::SimulationContext;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Incoming search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmokeRequest {
    /// Target landing point `[x, y, z]` in game units
    pub target_pos: Vec<f32>,
    /// Throw type name; defaults to `STRONG`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_type: Option<String>,
    /// Strategy name; defaults to `GRID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Result cap; defaults to the search configuration's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

/// A request after validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    /// Target landing point (game space)
    pub target: Vec3,
    /// Parsed throw type, `Strong` when none was given
    pub throw_type: ThrowType,
    /// Parsed strategy, `Grid` when none was given
    pub strategy: SearchStrategy,
    /// Result cap, at least 1
    pub max_results: usize,
}

impl SmokeRequest {
    /// Request for `target` with every other field defaulted
    pub fn new(target: &Vec3) -> Self {
        Self {
            target_pos: vec![target.x, target.y, target.z],
            ..Default::default()
        }
    }

    /// Parse names and fill defaults.
    ///
    /// # Errors
    /// `InvalidInput` for a target that is not three finite numbers, an
    /// unknown throw type or strategy, or a zero result cap.
    pub fn validate(&self, default_max_results: usize) -> Result<ValidatedRequest> {
        let target = vec3_from_slice(&self.target_pos)?;
        let throw_type = self
            .throw_type
            .as_deref()
            .map_or(Ok(ThrowType::default()), str::parse)?;
        let strategy = self
            .strategy
            .as_deref()
            .map_or(Ok(SearchStrategy::default()), str::parse)?;
        let max_results = self.max_results.unwrap_or(default_max_results);
        if max_results == 0 {
            return Err(SmokeError::invalid_input("max_results must be at least 1"));
        }

        Ok(ValidatedRequest {
            target,
            throw_type,
            strategy,
            max_results,
        })
    }
}

/// Outcome of a request: `{success: true, smokes}` or `{success: false, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeResponse {
    /// Whether the search ran
    pub success: bool,
    /// Ranked solutions, best first; present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smokes: Option<Vec<SmokeSolution>>,
    /// Failure message; present when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SmokeResponse {
    /// Successful response
    pub fn ok(smokes: Vec<SmokeSolution>) -> Self {
        Self {
            success: true,
            smokes: Some(smokes),
            error: None,
        }
    }

    /// Failed response carrying the error text
    pub fn failure(error: &SmokeError) -> Self {
        Self {
            success: false,
            smokes: None,
            error: Some(error.to_string()),
        }
    }
}

/// Liveness report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"ok"` while the process answers
    pub status: String,
    /// Whether the physics backend can be built
    pub initialized: bool,
}

/// Health probe for a context
pub fn health(context: &SimulationContext) -> HealthStatus {
    HealthStatus {
        status: "ok".to_string(),
        initialized: context.is_initialized(),
    }
}

/// Validate and run a search request
pub fn handle_request(context: &SimulationContext, request: &SmokeRequest) -> SmokeResponse {
    let outcome = request
        .validate(context.search_config().default_max_results)
        .and_then(|req| {
            info!(
                "Smoke request: target [{:.1}, {:.1}, {:.1}], {}, {}, max {}",
                req.target.x,
                req.target.y,
                req.target.z,
                req.throw_type,
                req.strategy,
                req.max_results
            );
            context.find_solutions(&req.target, req.throw_type, req.strategy, req.max_results)
        });

    match outcome {
        Ok(smokes) => SmokeResponse::ok(smokes),
        Err(e) => {
            warn!("Smoke request failed: {}", e);
            SmokeResponse::failure(&e)
        }
    }
}
