//! Generation tuning: density field, caps, retry budgets, truncation policy.
//!
//! `Default` reproduces the stock galaxy. Any field may be overridden from
//! JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::density::DensityField;
use crate::error::GenerationError;

/// What happens when the collision-retry budget runs out for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// Skip the unit; the region ends up with fewer entries than targeted.
    #[default]
    Truncate,
    /// Abort the whole region with no writes.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub density: DensityField,
    pub max_systems_per_sector: u32,
    pub sector_placement_attempts: u32,
    pub system_placement_attempts: u32,
    pub inner_planet_chance: f64,
    pub placement_policy: PlacementPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            density: DensityField::default(),
            max_systems_per_sector: MAX_SYSTEMS_PER_SECTOR,
            sector_placement_attempts: SECTOR_PLACEMENT_ATTEMPTS,
            system_placement_attempts: SYSTEM_PLACEMENT_ATTEMPTS,
            inner_planet_chance: INNER_PLANET_CHANCE,
            placement_policy: PlacementPolicy::Truncate,
        }
    }
}

impl GenerationConfig {
    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make generation panic or meaningless.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.density.validate()?;
        if !(0.0..=1.0).contains(&self.inner_planet_chance) {
            return Err(GenerationError::InvalidConfig(format!(
                "inner_planet_chance must be within [0, 1] (got {})",
                self.inner_planet_chance
            )));
        }
        Ok(())
    }
}
