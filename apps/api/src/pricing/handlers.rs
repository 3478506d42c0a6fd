//! Axum route handlers for the Pricing API.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::pricing::cache::CacheOutcome;
use crate::pricing::engine::{EstimateError, EstimateInput, EstimateResult};
use crate::pricing::profiles::TerrainType;
use crate::pricing::summary::summarize;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Job inputs as sent by the form. `terrain` stays a string so an unknown
/// value becomes a validation message rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    pub terrain: String,
    pub area_m2: f64,
    pub vegetation_height_cm: f64,
    pub crew_size: u32,
    pub margin_percent: f64,
}

impl EstimateRequest {
    pub fn to_input(&self) -> Result<EstimateInput, EstimateError> {
        let terrain = self.terrain.parse::<TerrainType>().map_err(|_| {
            EstimateError::InvalidInput(format!(
                "Unknown terrain type '{}'. Expected 'field' or 'forest'.",
                self.terrain.trim()
            ))
        })?;

        Ok(EstimateInput {
            terrain,
            area_m2: self.area_m2,
            vegetation_height_cm: self.vegetation_height_cm,
            crew_size: self.crew_size,
            margin_percent: self.margin_percent,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub estimate: EstimateResult,
    pub summary: String,
    /// True when served from the one-slot cache.
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct TerrainInfo {
    pub terrain: TerrainType,
    pub display_name: &'static str,
    pub yield_per_hour: f64,
    pub unit_cost_by_crew_tier: BTreeMap<u8, f64>,
}

#[derive(Debug, Serialize)]
pub struct TerrainListResponse {
    pub terrains: Vec<TerrainInfo>,
    pub tax_rate: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Computes an estimate through the shared cache.
pub fn compute_estimate(
    state: &AppState,
    input: &EstimateInput,
) -> Result<(EstimateResult, CacheOutcome), AppError> {
    let outcome = state.cache().get_or_compute(input, &state.pricing)?;
    debug!("Estimate for {:?}: {:?}", input, outcome.1);
    Ok(outcome)
}

/// POST /api/v1/estimate
///
/// Returns the four-value estimate plus a short narrative summary.
pub async fn handle_estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let input = request.to_input()?;
    let (estimate, outcome) = compute_estimate(&state, &input)?;

    Ok(Json(EstimateResponse {
        summary: summarize(&input, &estimate),
        estimate,
        cached: outcome == CacheOutcome::Hit,
    }))
}

/// GET /api/v1/terrains
///
/// Lists configured terrain profiles, for populating the job form.
pub async fn handle_list_terrains(State(state): State<AppState>) -> Json<TerrainListResponse> {
    let terrains = state
        .pricing
        .terrains()
        .into_iter()
        .filter_map(|terrain| state.pricing.profile(terrain))
        .map(|profile| TerrainInfo {
            terrain: profile.terrain,
            display_name: profile.terrain.display_name(),
            yield_per_hour: profile.yield_per_hour,
            unit_cost_by_crew_tier: profile.unit_cost_by_crew_tier.clone(),
        })
        .collect();

    Json(TerrainListResponse {
        terrains,
        tax_rate: state.pricing.tax_rate,
    })
}
