//! Pricing Engine: pure computation from job inputs to the four-value estimate.
//!
//! # Algorithm
//! 1. Look up yield and the crew-tier unit cost for the terrain.
//! 2. Vegetation factor: `1 + max(0, floor((height - 30) / 10)) × 0.10`.
//! 3. Hours: `(area / yield) × factor / crew`.
//! 4. Ex-tax prices: `unit_cost × factor`, then `× area` for the total.
//! 5. Margin is applied to both ex-tax prices, then tax to the total.
//!
//! Margin-then-tax order is load-bearing. No rounding happens here; formatting
//! belongs to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::profiles::{PricingConfig, TerrainType};

/// Vegetation at or below this height carries no surcharge.
pub const BASE_VEGETATION_HEIGHT_CM: f64 = 30.0;
/// Each full step above the base height adds one surcharge increment.
pub const VEGETATION_STEP_CM: f64 = 10.0;
pub const VEGETATION_STEP_SURCHARGE: f64 = 0.10;

pub const MAX_MARGIN_PERCENT: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub terrain: TerrainType,
    pub area_m2: f64,
    pub vegetation_height_cm: f64,
    pub crew_size: u32,
    pub margin_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub estimated_hours: f64,
    /// Price per m², margin included, tax excluded.
    pub unit_price_ex_tax: f64,
    pub total_price_ex_tax: f64,
    pub total_price_inc_tax: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// Caller-supplied values outside the accepted domain. The message is user-facing.
    #[error("{0}")]
    InvalidInput(String),

    #[error("no pricing profile is configured for terrain '{0}'")]
    UnknownTerrain(TerrainType),

    /// Arithmetic produced NaN or infinity; should not happen for validated inputs.
    #[error("calculation produced a non-finite {0}")]
    NonFinite(&'static str),
}

impl EstimateError {
    /// True when the caller can fix the request; false for internal calculation faults.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            EstimateError::InvalidInput(_) | EstimateError::UnknownTerrain(_)
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

impl EstimateInput {
    /// Checks the input domain. Runs before any arithmetic.
    pub fn validate(&self) -> Result<(), EstimateError> {
        if !self.area_m2.is_finite() || self.area_m2 <= 0.0 {
            return Err(EstimateError::InvalidInput(
                "Area must be greater than 0 m².".to_string(),
            ));
        }
        if !self.vegetation_height_cm.is_finite() || self.vegetation_height_cm < 0.0 {
            return Err(EstimateError::InvalidInput(
                "Vegetation height cannot be negative.".to_string(),
            ));
        }
        if self.crew_size < 1 {
            return Err(EstimateError::InvalidInput(
                "The crew needs at least 1 worker.".to_string(),
            ));
        }
        if !self.margin_percent.is_finite()
            || !(0.0..=MAX_MARGIN_PERCENT).contains(&self.margin_percent)
        {
            return Err(EstimateError::InvalidInput(
                "Margin must be between 0 and 100%.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Surcharge multiplier for tall vegetation. A step function: only full 10 cm
/// steps above 30 cm count, so 39 cm prices the same as 30 cm.
pub fn vegetation_factor(height_cm: f64) -> f64 {
    let steps = ((height_cm - BASE_VEGETATION_HEIGHT_CM) / VEGETATION_STEP_CM)
        .floor()
        .max(0.0);
    1.0 + steps * VEGETATION_STEP_SURCHARGE
}

/// Computes the estimate for one clearing job.
pub fn estimate(
    input: &EstimateInput,
    config: &PricingConfig,
) -> Result<EstimateResult, EstimateError> {
    input.validate()?;

    let profile = config
        .profile(input.terrain)
        .ok_or(EstimateError::UnknownTerrain(input.terrain))?;
    let base_unit_cost = profile
        .unit_cost(input.crew_size)
        .ok_or(EstimateError::UnknownTerrain(input.terrain))?;

    let factor = vegetation_factor(input.vegetation_height_cm);
    let crew = f64::from(input.crew_size);

    let estimated_hours = (input.area_m2 / profile.yield_per_hour) * factor / crew;

    let unit_before_margin = base_unit_cost * factor;
    let total_before_margin = unit_before_margin * input.area_m2;

    let margin_factor = 1.0 + input.margin_percent / 100.0;
    let unit_price_ex_tax = unit_before_margin * margin_factor;
    let total_price_ex_tax = total_before_margin * margin_factor;

    let total_price_inc_tax = total_price_ex_tax * (1.0 + config.tax_rate);

    let result = EstimateResult {
        estimated_hours,
        unit_price_ex_tax,
        total_price_ex_tax,
        total_price_inc_tax,
    };
    result.ensure_finite()?;
    Ok(result)
}

impl EstimateResult {
    fn ensure_finite(&self) -> Result<(), EstimateError> {
        let fields = [
            ("estimated hours", self.estimated_hours),
            ("unit price", self.unit_price_ex_tax),
            ("total ex tax", self.total_price_ex_tax),
            ("total inc tax", self.total_price_inc_tax),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(EstimateError::NonFinite(name)),
            None => Ok(()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
