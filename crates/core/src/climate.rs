//! Process-wide climate state.
//!
//! The host owns these values between ticks (UI sliders, scripted weather);
//! the engine reads whatever is present at the start of each `step()` and
//! only writes `temperature`, which relaxes toward a fire-driven target.

use crate::core_types::rng::SimRng;
use crate::core_types::units::Degrees;
use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Minimum value any divisor derived from climate or terrain may take.
/// Humidity and altitude are host/procedurally controlled and can reach
/// zero; dividing by them must not.
pub(crate) const MIN_DIVISOR: f64 = 0.1;

/// Interval, in ticks, at which [`Climate::ambient_drift`] re-rolls whether
/// it is actively raining.
const RAIN_REROLL_INTERVAL: u64 = 20;

/// Global weather state shared by every agent in a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Climate {
    /// Wind direction; the wind vector for θ is `(sin θ, −cos θ)`.
    pub wind_direction: Degrees,
    /// Wind speed, never negative.
    pub wind_speed: f64,
    /// Precipitation level in `[0, 1]`.
    pub rain_level: f64,
    /// Relative humidity. Clamped away from zero at every use.
    pub humidity: f64,
    /// Global air temperature in °C, relaxed by the model each tick.
    pub temperature: f64,
    /// Whether rain is actively falling right now. While set, the
    /// precipitation contribution to fire spread is forced to zero.
    pub rain_active: bool,
}

impl Default for Climate {
    fn default() -> Self {
        Climate {
            wind_direction: Degrees::new(0.0),
            wind_speed: 2.0,
            rain_level: 0.0,
            humidity: 40.0,
            temperature: 25.0,
            rain_active: false,
        }
    }
}

impl Climate {
    /// Unit vector the wind blows toward, in grid space (y grows downward).
    #[must_use]
    pub fn wind_vector(&self) -> Vector2<f64> {
        let rad = self.wind_direction.to_radians();
        Vector2::new(rad.sin(), -rad.cos())
    }

    /// Effective fire-spread radius in cells: `1 + round(wind_speed / 10)`.
    #[must_use]
    pub fn spread_radius(&self) -> i32 {
        1 + (self.wind_speed / 10.0).round() as i32
    }

    /// Humidity floored away from zero, safe to divide by.
    #[must_use]
    pub fn humidity_floored(&self) -> f64 {
        self.humidity.max(MIN_DIVISOR)
    }

    /// Relax the global temperature toward `25 + 0.5 * burning_count` with
    /// exponential smoothing factor 0.1.
    pub fn relax_temperature(&mut self, burning_count: usize) {
        let target = 25.0 + 0.5 * burning_count as f64;
        self.temperature += (target - self.temperature) * 0.1;
    }

    /// Host-side weather drift: small random walk on wind direction and
    /// speed, plus a periodic re-roll of `rain_active` as a Bernoulli draw
    /// on `rain_level`.
    ///
    /// This is deliberately *not* called by `Simulation::step`, so scripted
    /// scenarios (e.g. wind held at zero) stay exactly where the host put
    /// them. Drive it from the host loop when organic weather is wanted.
    pub fn ambient_drift(&mut self, rng: &mut SimRng, tick: u64) {
        self.wind_direction += rng.random_range(-1.0..=1.0);
        self.wind_speed = (self.wind_speed + rng.random_range(-0.3..=0.3)).max(0.0);
        if tick % RAIN_REROLL_INTERVAL == 0 {
            self.rain_active = rng.bernoulli(self.rain_level);
        }
    }
}
