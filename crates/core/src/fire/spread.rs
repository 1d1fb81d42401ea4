//! Ignition probability model.
//!
//! Every burning cell pushes an ignition probability onto each neighbor
//! within the wind-dependent spread radius. The probability is a distance
//! kernel times the sum of environmental factors, scaled by the target's
//! species flammability:
//!
//! ```text
//! p = (1 / distance)
//!   * (altitude + precipitation + tree_height + humidity + wind + temperature)
//!   * flammability(target)
//! ```
//!
//! The factor weights are tunable configuration, not physical constants;
//! the defaults canonicalize the most complete historical parameter set.
//! Raw probabilities may leave `[0, 1]` and are clamped at the Bernoulli
//! draw, never earlier.

use crate::climate::{Climate, MIN_DIVISOR};
use crate::core_types::position::GridPos;
use serde::{Deserialize, Serialize};

/// Weights of the fire-spread factor sum, plus the automaton's two
/// non-factor knobs (ember spawn odds and the Dangered cooldown).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadCoefficients {
    /// Weight of the altitude term (`α / max(altitude, 0.1)`, or `α` at sea
    /// level).
    pub altitude: f64,
    /// Weight of the precipitation term (`(1 − rain_level) · α`; forced to
    /// zero while rain is actively falling).
    pub precipitation: f64,
    /// Weight of the source tree-height term.
    pub tree_height: f64,
    /// Weight of the humidity term (`α / max(humidity, 0.1)`).
    pub humidity: f64,
    /// Weight of the wind-alignment term.
    pub wind: f64,
    /// Conversion from wind speed to the wind term's magnitude.
    pub wind_speed_scale: f64,
    /// Weight of the global-temperature term.
    pub temperature: f64,
    /// Per-tick probability that a burning cell lofts an ember.
    pub ember_spawn: f64,
}

impl Default for SpreadCoefficients {
    fn default() -> Self {
        SpreadCoefficients {
            altitude: 0.025,
            precipitation: 0.3,
            tree_height: 0.025,
            humidity: 0.3,
            wind: 0.05,
            wind_speed_scale: 0.0666667,
            temperature: 0.3,
            ember_spawn: 0.20,
        }
    }
}

/// The burning cell's contribution to an ignition attempt: where it is and
/// the static attributes that feed the factor sum.
#[derive(Debug, Clone, Copy)]
pub struct SpreadSource {
    pub pos: GridPos,
    pub altitude: f64,
    pub tree_height: f64,
}

impl SpreadCoefficients {
    /// Raw (unclamped) probability that the burning `source` cell ignites
    /// the cell at `target` this tick.
    ///
    /// Altitude and tree height belong to the burning cell,
    /// `target_flammability` to the cell being ignited. `distance` must be
    /// positive; the source cell never targets itself.
    #[must_use]
    pub fn ignition_probability(
        &self,
        climate: &Climate,
        source: SpreadSource,
        target: GridPos,
        target_flammability: f64,
        distance: f64,
    ) -> f64 {
        let base = 1.0 / distance.max(MIN_DIVISOR);

        let altitude_factor = if source.altitude <= 0.0 {
            self.altitude
        } else {
            self.altitude / source.altitude.max(MIN_DIVISOR)
        };

        let precip_factor = if climate.rain_active {
            0.0
        } else {
            (1.0 - climate.rain_level) * self.precipitation
        };

        let height_factor = source.tree_height * self.tree_height;
        let humidity_factor = self.humidity / climate.humidity_floored();
        let wind_factor = self.wind_alignment(climate, source.pos, target) * self.wind;
        let temperature_factor = climate.temperature * self.temperature;

        let combined = altitude_factor
            + precip_factor
            + height_factor
            + humidity_factor
            + wind_factor
            + temperature_factor;

        base * combined * target_flammability
    }

    /// Signed wind alignment of the source→target direction: positive in
    /// the downwind cone, negative upwind, scaled by wind speed.
    fn wind_alignment(&self, climate: &Climate, source: GridPos, target: GridPos) -> f64 {
        let dx = f64::from(target.x - source.x);
        let dy = f64::from(target.y - source.y);
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        let bearing = dy.atan2(dx);
        let delta = bearing - climate.wind_direction.to_radians();
        delta.cos() * climate.wind_speed * self.wind_speed_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::Degrees;

    fn hillside(pos: GridPos) -> SpreadSource {
        SpreadSource {
            pos,
            altitude: 10.0,
            tree_height: 8.0,
        }
    }

    fn probability(climate: &Climate) -> f64 {
        SpreadCoefficients::default().ignition_probability(
            climate,
            hillside(GridPos::new(5, 5)),
            GridPos::new(6, 5),
            0.8,
            1.0,
        )
    }

    #[test]
    fn rain_and_humidity_suppress_ignition() {
        let dry = Climate {
            rain_level: 0.0,
            humidity: 1.0,
            ..Climate::default()
        };
        let wet = Climate {
            rain_level: 1.0,
            rain_active: true,
            humidity: 90.0,
            ..Climate::default()
        };

        assert!(
            probability(&wet) < probability(&dry),
            "saturated rain and high humidity must strictly lower the odds"
        );
    }

    #[test]
    fn active_rain_zeroes_the_precipitation_term() {
        let mut climate = Climate {
            rain_level: 0.0, // (1 - 0) * α is the full term
            ..Climate::default()
        };
        let dry = probability(&climate);
        climate.rain_active = true;
        let raining = probability(&climate);
        let coeffs = SpreadCoefficients::default();
        // the difference is exactly the precipitation term (base=1, flam=0.8)
        let expected_drop = coeffs.precipitation * 0.8;
        assert!((dry - raining - expected_drop).abs() < 1e-12);
    }

    #[test]
    fn downwind_beats_upwind() {
        let coeffs = SpreadCoefficients::default();
        let climate = Climate {
            wind_speed: 20.0,
            // 0 degrees points along +x, the bearing of (6,5) from (5,5)
            wind_direction: Degrees::new(0.0),
            ..Climate::default()
        };

        let source = hillside(GridPos::new(5, 5));
        let downwind =
            coeffs.ignition_probability(&climate, source, GridPos::new(6, 5), 0.8, 1.0);
        let upwind = coeffs.ignition_probability(&climate, source, GridPos::new(4, 5), 0.8, 1.0);
        assert!(downwind > upwind);

        // crosswind targets sit on the cone boundary and pick up no wind term
        let crosswind =
            coeffs.ignition_probability(&climate, source, GridPos::new(5, 6), 0.8, 1.0);
        assert!(downwind > crosswind && crosswind > upwind);
    }

    #[test]
    fn probability_halves_with_distance() {
        let coeffs = SpreadCoefficients::default();
        let climate = Climate {
            wind_speed: 0.0,
            ..Climate::default()
        };
        let source = hillside(GridPos::new(0, 5));
        let near = coeffs.ignition_probability(&climate, source, GridPos::new(1, 5), 0.8, 1.0);
        let far = coeffs.ignition_probability(&climate, source, GridPos::new(2, 5), 0.8, 2.0);
        assert!((near - 2.0 * far).abs() < 1e-12);
    }

    #[test]
    fn sea_level_uses_flat_altitude_weight() {
        let coeffs = SpreadCoefficients::default();
        let climate = Climate::default();
        let at_sea = coeffs.ignition_probability(
            &climate,
            SpreadSource {
                pos: GridPos::new(0, 0),
                altitude: 0.0,
                tree_height: 8.0,
            },
            GridPos::new(1, 0),
            0.8,
            1.0,
        );
        let high_up = coeffs.ignition_probability(
            &climate,
            SpreadSource {
                pos: GridPos::new(0, 0),
                altitude: 40.0,
                tree_height: 8.0,
            },
            GridPos::new(1, 0),
            0.8,
            1.0,
        );
        // α vs α/40: sea level carries the larger altitude term
        assert!(at_sea > high_up);
    }
}
