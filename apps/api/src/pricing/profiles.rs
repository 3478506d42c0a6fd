//! Terrain profiles and tax rate: the static pricing configuration.
//!
//! Loaded once at startup (embedded reference values, or a JSON file named by
//! `PRICING_CONFIG`) and shared read-only for the lifetime of the process.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Terrain type
// ────────────────────────────────────────────────────────────────────────────

/// The two supported clearing jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    /// Open field: grass, weeds, low scrub.
    Field,
    /// Forest floor: undergrowth between trees.
    Forest,
}

impl TerrainType {
    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainType::Field => "Field",
            TerrainType::Forest => "Forest",
        }
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown terrain type '{0}'")]
pub struct UnknownTerrain(pub String);

impl FromStr for TerrainType {
    type Err = UnknownTerrain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "field" => Ok(TerrainType::Field),
            "forest" => Ok(TerrainType::Forest),
            other => Err(UnknownTerrain(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// Crew tier used for the unit-cost lookup. Tiering is binary: one worker, or a team.
pub const SOLO_TIER: u8 = 1;
pub const TEAM_TIER: u8 = 2;

/// Maps a crew size onto its cost tier.
pub fn crew_tier(crew_size: u32) -> u8 {
    if crew_size == 1 {
        SOLO_TIER
    } else {
        TEAM_TIER
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    pub terrain: TerrainType,
    /// Area (m²) cleared per hour by the base crew at base vegetation height.
    pub yield_per_hour: f64,
    /// Cost per m² before vegetation factor, margin and tax, keyed by crew tier.
    pub unit_cost_by_crew_tier: BTreeMap<u8, f64>,
}

impl TerrainProfile {
    /// Unit cost for a crew size. Profiles are validated on load, so both tiers exist.
    pub fn unit_cost(&self, crew_size: u32) -> Option<f64> {
        self.unit_cost_by_crew_tier
            .get(&crew_tier(crew_size))
            .copied()
    }
}

/// Immutable pricing configuration: one profile per terrain plus the tax rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    profiles: HashMap<TerrainType, TerrainProfile>,
    pub tax_rate: f64,
}

#[derive(Debug, Error)]
pub enum PricingConfigError {
    #[error("cannot read pricing config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pricing config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("pricing config has an unrecognized terrain key '{0}'")]
    UnknownTerrain(String),

    #[error("terrain '{terrain}' is missing the cost for crew tier {tier}")]
    MissingTier { terrain: TerrainType, tier: u8 },

    #[error("invalid pricing config: {0}")]
    Invalid(String),
}

/// On-disk shape of the pricing config.
#[derive(Debug, Deserialize)]
struct RawPricingConfig {
    tax_rate: f64,
    terrains: HashMap<String, RawTerrainProfile>,
}

#[derive(Debug, Deserialize)]
struct RawTerrainProfile {
    yield_per_hour: f64,
    unit_cost_by_crew_tier: BTreeMap<u8, f64>,
}

impl PricingConfig {
    /// The reference configuration: field 200 m²/h, forest 190 m²/h, 6% tax.
    pub fn reference() -> Self {
        let profiles = [
            TerrainProfile {
                terrain: TerrainType::Field,
                yield_per_hour: 200.0,
                unit_cost_by_crew_tier: BTreeMap::from([
                    (SOLO_TIER, 0.0667),
                    (TEAM_TIER, 0.1334),
                ]),
            },
            TerrainProfile {
                terrain: TerrainType::Forest,
                yield_per_hour: 190.0,
                unit_cost_by_crew_tier: BTreeMap::from([
                    (SOLO_TIER, 0.08491),
                    (TEAM_TIER, 0.16982),
                ]),
            },
        ];

        PricingConfig {
            profiles: profiles.into_iter().map(|p| (p.terrain, p)).collect(),
            tax_rate: 0.06,
        }
    }

    /// Loads and validates a JSON pricing config from disk.
    pub fn from_file(path: &Path) -> Result<Self, PricingConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PricingConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON pricing config.
    pub fn from_json(json: &str) -> Result<Self, PricingConfigError> {
        let raw: RawPricingConfig = serde_json::from_str(json)?;

        if !raw.tax_rate.is_finite() || raw.tax_rate < 0.0 {
            return Err(PricingConfigError::Invalid(format!(
                "tax_rate must be a non-negative number, got {}",
                raw.tax_rate
            )));
        }

        let mut profiles = HashMap::with_capacity(raw.terrains.len());
        for (key, profile) in raw.terrains {
            let terrain = key
                .parse::<TerrainType>()
                .map_err(|_| PricingConfigError::UnknownTerrain(key.clone()))?;

            if !profile.yield_per_hour.is_finite() || profile.yield_per_hour <= 0.0 {
                return Err(PricingConfigError::Invalid(format!(
                    "yield_per_hour for '{terrain}' must be positive"
                )));
            }
            for tier in [SOLO_TIER, TEAM_TIER] {
                match profile.unit_cost_by_crew_tier.get(&tier) {
                    None => return Err(PricingConfigError::MissingTier { terrain, tier }),
                    Some(cost) if !cost.is_finite() || *cost < 0.0 => {
                        return Err(PricingConfigError::Invalid(format!(
                            "tier {tier} cost for '{terrain}' must be a non-negative number"
                        )))
                    }
                    Some(_) => {}
                }
            }

            profiles.insert(
                terrain,
                TerrainProfile {
                    terrain,
                    yield_per_hour: profile.yield_per_hour,
                    unit_cost_by_crew_tier: profile.unit_cost_by_crew_tier,
                },
            );
        }

        if profiles.is_empty() {
            return Err(PricingConfigError::Invalid(
                "at least one terrain profile is required".to_string(),
            ));
        }

        Ok(PricingConfig {
            profiles,
            tax_rate: raw.tax_rate,
        })
    }

    pub fn profile(&self, terrain: TerrainType) -> Option<&TerrainProfile> {
        self.profiles.get(&terrain)
    }

    /// Terrains with a configured profile, in a stable order.
    pub fn terrains(&self) -> Vec<TerrainType> {
        let mut terrains: Vec<TerrainType> = self.profiles.keys().copied().collect();
        terrains.sort();
        terrains
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::reference()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
