//! Vegetation species and their combustion parameters.

use crate::core_types::rng::SimRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tree species growing on forested cells.
///
/// Eucalyptus is the volatile one: it ignites more readily (higher
/// flammability multiplier) and burns out faster (shorter burn window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Pine,
    Eucalyptus,
}

impl Species {
    /// Per-species scalar applied to every ignition probability targeting
    /// a cell of this species.
    #[must_use]
    pub fn flammability(self) -> f64 {
        match self {
            Species::Pine => 0.5,
            Species::Eucalyptus => 0.8,
        }
    }

    /// Draw the number of ticks a cell of this species burns before it
    /// turns to ash.
    pub fn roll_burn_ticks(self, rng: &mut SimRng) -> i32 {
        match self {
            Species::Pine => rng.random_range(4..=6),
            Species::Eucalyptus => rng.random_range(2..=4),
        }
    }
}
