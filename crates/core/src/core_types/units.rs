//! Semantic unit types for angle handling.
//!
//! Wind direction is the one quantity the host mutates freely between ticks,
//! so it gets a newtype that keeps the value normalized into `[0, 360)` on
//! every write. All trigonometry inside the engine goes through
//! [`Degrees::to_radians`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Compass angle in degrees, always normalized into `[0, 360)`.
///
/// `0°` points "up-wind north": the wind vector for direction θ is
/// `(sin θ, −cos θ)`, matching the screen-space convention of the grid
/// (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

impl Degrees {
    /// Create a new angle, wrapping the value into `[0, 360)`.
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        Degrees(value.rem_euclid(360.0))
    }

    /// Raw value in degrees, guaranteed to lie in `[0, 360)`.
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to radians for trigonometry.
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl Add<f64> for Degrees {
    type Output = Degrees;

    fn add(self, rhs: f64) -> Degrees {
        Degrees::new(self.0 + rhs)
    }
}

impl AddAssign<f64> for Degrees {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}
