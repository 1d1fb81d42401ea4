//! Integer grid coordinates and the small amount of geometry agents need.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate on the terrain grid.
///
/// Signed so intermediate offset math (wind shifts, line walking) cannot
/// underflow; anything that lands outside the grid is clipped or rejected
/// at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        GridPos { x, y }
    }

    /// Round a continuous point to the nearest cell.
    #[must_use]
    pub fn rounded(x: f64, y: f64) -> Self {
        GridPos {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    /// Euclidean distance to another cell.
    #[must_use]
    pub fn distance(self, other: GridPos) -> f64 {
        f64::from(other.x - self.x).hypot(f64::from(other.y - self.y))
    }

    /// One 8-way step toward `target`: each axis moves by the sign of its
    /// remaining delta. Returns `self` when already there.
    #[must_use]
    pub fn step_toward(self, target: GridPos) -> GridPos {
        GridPos {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    /// Clip the position into a `width` x `height` grid.
    #[must_use]
    pub fn clamped(self, width: u32, height: u32) -> GridPos {
        GridPos {
            x: self.x.clamp(0, width as i32 - 1),
            y: self.y.clamp(0, height as i32 - 1),
        }
    }

    /// Continuous view of the cell center for vector math.
    #[must_use]
    pub fn as_vector(self) -> Vector2<f64> {
        Vector2::new(f64::from(self.x), f64::from(self.y))
    }

    /// Chebyshev (Moore) distance to another cell.
    #[must_use]
    pub fn chebyshev(self, other: GridPos) -> i32 {
        (other.x - self.x).abs().max((other.y - self.y).abs())
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_euclidean() {
        assert_relative_eq!(GridPos::new(0, 0).distance(GridPos::new(3, 4)), 5.0);
        assert_relative_eq!(GridPos::new(2, 2).distance(GridPos::new(2, 2)), 0.0);
    }

    #[test]
    fn step_toward_moves_one_cell_per_axis() {
        let from = GridPos::new(5, 5);
        assert_eq!(from.step_toward(GridPos::new(9, 5)), GridPos::new(6, 5));
        assert_eq!(from.step_toward(GridPos::new(0, 0)), GridPos::new(4, 4));
        assert_eq!(from.step_toward(from), from);
    }

    #[test]
    fn clamped_clips_to_bounds() {
        assert_eq!(GridPos::new(-3, 7).clamped(5, 5), GridPos::new(0, 4));
        assert_eq!(GridPos::new(2, 2).clamped(5, 5), GridPos::new(2, 2));
    }

    #[test]
    fn chebyshev_is_moore_radius() {
        assert_eq!(GridPos::new(0, 0).chebyshev(GridPos::new(1, 1)), 1);
        assert_eq!(GridPos::new(0, 0).chebyshev(GridPos::new(-2, 1)), 2);
    }
}
