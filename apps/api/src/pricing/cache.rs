//! One-slot memoization of the last estimate, keyed by the exact input tuple.
//!
//! A request with a different signature invalidates the slot before computing,
//! so a stale result is never served for changed inputs.

use crate::pricing::engine::{estimate, EstimateError, EstimateInput, EstimateResult};
use crate::pricing::profiles::{PricingConfig, TerrainType};

/// Exact-match signature of an `EstimateInput`. Floats compare by bit pattern,
/// so `-0.0` and `0.0` are distinct keys; both are rejected by validation anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EstimateKey {
    terrain: TerrainType,
    area_bits: u64,
    height_bits: u64,
    crew_size: u32,
    margin_bits: u64,
}

impl From<&EstimateInput> for EstimateKey {
    fn from(input: &EstimateInput) -> Self {
        EstimateKey {
            terrain: input.terrain,
            area_bits: input.area_m2.to_bits(),
            height_bits: input.vegetation_height_cm.to_bits(),
            crew_size: input.crew_size,
            margin_bits: input.margin_percent.to_bits(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EstimateCache {
    slot: Option<(EstimateKey, EstimateResult)>,
}

/// Whether a lookup was served from the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

impl EstimateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized result when `input` matches the slot exactly.
    pub fn get(&self, input: &EstimateInput) -> Option<EstimateResult> {
        let key = EstimateKey::from(input);
        match &self.slot {
            Some((cached, result)) if *cached == key => Some(*result),
            _ => None,
        }
    }

    /// Clears the slot.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Serves from the slot or computes, replacing the slot on success.
    ///
    /// A failed computation leaves the slot empty: the signature changed, so the
    /// previous result no longer applies.
    pub fn get_or_compute(
        &mut self,
        input: &EstimateInput,
        config: &PricingConfig,
    ) -> Result<(EstimateResult, CacheOutcome), EstimateError> {
        if let Some(result) = self.get(input) {
            return Ok((result, CacheOutcome::Hit));
        }

        self.invalidate();
        let result = estimate(input, config)?;
        self.slot = Some((EstimateKey::from(input), result));
        Ok((result, CacheOutcome::Miss))
    }
}
