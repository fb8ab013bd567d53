//! Galaxy density field: how crowded each sector of the grid is.
//!
//! Density falls off radially from the galaxy center and is boosted along
//! spiral arms. The result is the expected fraction of sector cells that
//! hold a star system. Pure and deterministic: no randomness.

use serde::{Deserialize, Serialize};

use crate::constants::GALAXY_SIZE;
use crate::error::GenerationError;

/// Parameters of the radial + spiral density field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityField {
    pub center_density: f64,
    pub edge_density: f64,
    pub falloff: f64,
    pub spiral_factor: f64,
    pub arm_count: f64,
}

impl Default for DensityField {
    fn default() -> Self {
        Self {
            center_density: 0.7,
            edge_density: 0.05,
            falloff: 1.5,
            spiral_factor: 0.5,
            arm_count: 2.0,
        }
    }
}

impl DensityField {
    /// Check the parameters [`DensityField::at`] relies on.
    ///
    /// Every field must be finite and `0 <= edge_density <= center_density`.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let fields = [
            ("center_density", self.center_density),
            ("edge_density", self.edge_density),
            ("falloff", self.falloff),
            ("spiral_factor", self.spiral_factor),
            ("arm_count", self.arm_count),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GenerationError::InvalidConfig(format!(
                "density.{name} must be finite (got {value})"
            )));
        }
        if self.edge_density < 0.0 || self.edge_density > self.center_density {
            return Err(GenerationError::InvalidConfig(format!(
                "density.edge_density {} must be within [0, center_density {}]",
                self.edge_density, self.center_density
            )));
        }
        Ok(())
    }

    /// Density of the sector at grid position `(x, y)`.
    ///
    /// Always within `[edge_density, center_density]`. The field must pass
    /// [`DensityField::validate`].
    pub fn at(&self, x: u32, y: u32) -> f64 {
        let half = GALAXY_SIZE as f64 / 2.0;
        let nx = (x as f64 - half) / half;
        let ny = (y as f64 - half) / half;
        let distance = (nx * nx + ny * ny).sqrt().min(1.0);

        let base = self.center_density * (1.0 - distance).powf(self.falloff) + self.edge_density;

        let angle = ny.atan2(nx);
        let arm_phase = (angle * self.arm_count - 3.0 * distance).cos();
        let modifier = self.spiral_factor * distance * arm_phase * arm_phase;

        (base * (1.0 + modifier)).clamp(self.edge_density, self.center_density)
    }

    /// Density for every sector of a galaxy, row-major (`y` outer, `x` inner).
    pub fn map(&self) -> Vec<(u32, u32, f64)> {
        (0..GALAXY_SIZE)
            .flat_map(|y| (0..GALAXY_SIZE).map(move |x| (x, y, self.at(x, y))))
            .collect()
    }
}

/// Density at `(x, y)` with the default field parameters.
pub fn density(x: u32, y: u32) -> f64 {
    DensityField::default().at(x, y)
}

/// Full density map with the default field parameters.
pub fn density_map() -> Vec<(u32, u32, f64)> {
    DensityField::default().map()
}
