//! One-tick ember projectiles.
//!
//! A burning cell lofts an ember with fixed per-tick probability. The
//! landing cell is computed once at launch from the wind vector and a
//! random carry distance, clamped to the grid. The ember joins the live
//! set at the end of its spawning tick, flies exactly once on the next
//! tick (possibly igniting a forested landing cell), records its two-point
//! path into the model's ember history, and is removed unconditionally.

use crate::climate::Climate;
use crate::core_types::position::GridPos;
use crate::core_types::rng::SimRng;
use crate::grid::patch::PatchState;
use crate::grid::terrain::TerrainGrid;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Stable identity of an ember, key of the model's ember history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmberId(pub u32);

/// Tunable parameters of ember ignition on landing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmberCoefficients {
    /// Baseline ignition chance of a landed ember.
    pub base: f64,
    /// Weight of the `(1 − rain_level)` term.
    pub precipitation: f64,
    /// Weight of the `1 / humidity` term.
    pub humidity: f64,
}

impl Default for EmberCoefficients {
    fn default() -> Self {
        EmberCoefficients {
            base: 0.3,
            precipitation: 0.35,
            humidity: 0.35,
        }
    }
}

impl EmberCoefficients {
    /// Raw (unclamped) chance that a landed ember ignites a forested cell.
    #[must_use]
    pub fn ignition_chance(&self, climate: &Climate) -> f64 {
        self.base
            + (1.0 - climate.rain_level) * self.precipitation
            + self.humidity / climate.humidity_floored()
    }
}

/// A wind-carried ember in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ember {
    id: EmberId,
    origin: GridPos,
    landing: GridPos,
}

impl Ember {
    /// Loft an ember from `origin`. The landing cell is fixed here: origin
    /// shifted along the wind vector by a random carry of 2-6 cells scaled
    /// by wind speed (floored at 1 so calm air still carries embers), then
    /// clamped to the grid.
    pub(crate) fn launch(
        id: EmberId,
        origin: GridPos,
        climate: &Climate,
        grid_width: u32,
        grid_height: u32,
        rng: &mut SimRng,
    ) -> Self {
        let wind = climate.wind_vector();
        let carry = rng.random_range(2.0..6.0) * climate.wind_speed.max(1.0);
        let landing = GridPos::rounded(
            f64::from(origin.x) + wind.x * carry,
            f64::from(origin.y) + wind.y * carry,
        )
        .clamped(grid_width, grid_height);
        Ember { id, origin, landing }
    }

    #[must_use]
    pub fn id(&self) -> EmberId {
        self.id
    }

    #[must_use]
    pub fn origin(&self) -> GridPos {
        self.origin
    }

    #[must_use]
    pub fn landing(&self) -> GridPos {
        self.landing
    }

    /// The ember's single step: land, maybe ignite, record the path.
    /// Consumes the ember; it never survives a second tick.
    pub(crate) fn fly(
        self,
        grid: &mut TerrainGrid,
        climate: &Climate,
        coeffs: &EmberCoefficients,
        rng: &mut SimRng,
        history: &mut FxHashMap<EmberId, Vec<GridPos>>,
    ) {
        let chance = coeffs.ignition_chance(climate);
        let patch = grid.patch_mut(self.landing);
        if patch.state == PatchState::Forested && rng.bernoulli(chance) {
            patch.ignite();
            trace!(ember = self.id.0, landing = %self.landing, "ember ignition");
        }
        history.insert(self.id, vec![self.origin, self.landing]);
    }
}
