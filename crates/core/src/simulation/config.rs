//! Simulation construction parameters and their validation.

use crate::agents::ember::EmberCoefficients;
use crate::climate::Climate;
use crate::fire::spread::SpreadCoefficients;
use crate::grid::terrain::TerrainKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything needed to build a [`Simulation`](crate::Simulation).
///
/// Plain data with a sensible `Default`; hosts override fields and hand the
/// struct to `Simulation::new`, which validates it once. After construction
/// nothing here can fail again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Probability that a non-band cell is forested, in `[0, 1]`.
    pub density: f64,
    /// Share of forested cells that are eucalyptus, in `[0, 1]`.
    pub eucalyptus_share: f64,
    /// Terrain layout.
    pub terrain: TerrainKind,
    /// Number of firefighter crews stationed on the border.
    pub firefighter_count: u32,
    /// Share of crews using the water technique, in `[0, 1]`; the rest
    /// build firebreaks.
    pub water_ratio: f64,
    /// RNG seed. Identical configs with identical seeds replay identically.
    pub seed: u64,
    /// Fire-spread tuning.
    pub spread: SpreadCoefficients,
    /// Ember tuning.
    pub ember: EmberCoefficients,
    /// Initial weather.
    pub climate: Climate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            width: 50,
            height: 50,
            density: 0.7,
            eucalyptus_share: 0.5,
            terrain: TerrainKind::OnlyTrees,
            firefighter_count: 0,
            water_ratio: 0.5,
            seed: 0,
            spread: SpreadCoefficients::default(),
            ember: EmberCoefficients::default(),
            climate: Climate::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every field range. Called once by `Simulation::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::DensityOutOfRange(self.density));
        }
        for (name, value) in [
            ("eucalyptus_share", self.eucalyptus_share),
            ("water_ratio", self.water_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RatioOutOfRange { name, value });
            }
        }
        let capacity = border_capacity(self.width, self.height);
        if self.firefighter_count as usize > capacity {
            return Err(ConfigError::TooManyFirefighters {
                requested: self.firefighter_count,
                capacity,
            });
        }
        Ok(())
    }
}

/// Number of border cells available as firefighter home positions.
pub(crate) fn border_capacity(width: u32, height: u32) -> usize {
    let (w, h) = (width as usize, height as usize);
    let horizontal = w * if h > 1 { 2 } else { 1 };
    let vertical = h.saturating_sub(2) * if w > 1 { 2 } else { 1 };
    horizontal + vertical
}

/// Rejected construction parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be nonzero")]
    EmptyGrid,
    #[error("density {0} outside [0, 1]")]
    DensityOutOfRange(f64),
    #[error("{name} {value} outside [0, 1]")]
    RatioOutOfRange { name: &'static str, value: f64 },
    #[error("{requested} firefighters requested but the border holds {capacity}")]
    TooManyFirefighters { requested: u32, capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_grids() {
        let config = SimulationConfig {
            width: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn rejects_out_of_range_ratios() {
        let config = SimulationConfig {
            density: 1.5,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DensityOutOfRange(1.5))
        );

        let config = SimulationConfig {
            water_ratio: -0.1,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange {
                name: "water_ratio",
                ..
            })
        ));
    }

    #[test]
    fn border_capacity_matches_perimeter() {
        // 2w + 2h - 4 for grids with both sides >= 2
        assert_eq!(border_capacity(20, 18), 72);
        assert_eq!(border_capacity(2, 2), 4);
        // degenerate strips: every cell is a border cell
        assert_eq!(border_capacity(5, 1), 5);
        assert_eq!(border_capacity(1, 7), 7);
    }

    #[test]
    fn rejects_more_crews_than_border_cells() {
        let config = SimulationConfig {
            width: 4,
            height: 4,
            firefighter_count: 13,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyFirefighters {
                requested: 13,
                capacity: 12,
            })
        );
    }
}
