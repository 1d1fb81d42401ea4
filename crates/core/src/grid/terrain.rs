//! The terrain grid: patch storage, procedural generation and the spatial
//! queries agents run every tick.

use crate::core_types::position::GridPos;
use crate::core_types::rng::SimRng;
use crate::core_types::species::Species;
use crate::grid::patch::{Patch, PatchState};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Terrain layout generated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Forest everywhere density allows.
    OnlyTrees,
    /// Forest with a 3-row road band across the middle.
    RoadAndTrees,
    /// Forest with a 3-row river band at a third of the height. River maps
    /// also get a humidity boost at model construction.
    RiverAndTrees,
}

/// Half-width of the road/river band in rows (band spans `2 * HALF + 1`).
const BAND_HALF_WIDTH: i32 = 1;

/// Dense 2-D array of patches in row-major order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<Patch>,
}

impl TerrainGrid {
    /// Generate a terrain. Dimensions are assumed validated by the caller
    /// (the simulation config rejects empty grids before this runs).
    pub(crate) fn generate(
        width: u32,
        height: u32,
        density: f64,
        eucalyptus_share: f64,
        kind: TerrainKind,
        rng: &mut SimRng,
    ) -> Self {
        let road_row = (height / 2) as i32;
        let river_row = (height / 3) as i32;

        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let in_band = |row: i32| (y - row).abs() <= BAND_HALF_WIDTH;
                let patch = match kind {
                    TerrainKind::RoadAndTrees if in_band(road_row) => {
                        Patch::band(PatchState::Road)
                    }
                    TerrainKind::RiverAndTrees if in_band(river_row) => {
                        Patch::band(PatchState::River)
                    }
                    _ => Self::roll_forest_patch(
                        x,
                        y,
                        width,
                        height,
                        density,
                        eucalyptus_share,
                        rng,
                    ),
                };
                cells.push(patch);
            }
        }

        TerrainGrid {
            width,
            height,
            cells,
        }
    }

    /// Roll one vegetated-or-empty cell: altitude first, then the density
    /// draw, then species and tree height for forested cells.
    fn roll_forest_patch(
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        density: f64,
        eucalyptus_share: f64,
        rng: &mut SimRng,
    ) -> Patch {
        let altitude = Self::synthesize_altitude(x, y, width, height, rng);
        if rng.random::<f64>() > density {
            return Patch::empty(altitude);
        }
        let species = if rng.random::<f64>() < eucalyptus_share {
            Species::Eucalyptus
        } else {
            Species::Pine
        };
        let tree_height = rng.random_range(5.0..15.0);
        Patch::forested(species, tree_height, altitude)
    }

    /// Procedural altitude: a smooth sine/cosine hill profile plus noise,
    /// floored at sea level.
    fn synthesize_altitude(x: i32, y: i32, width: u32, height: u32, rng: &mut SimRng) -> f64 {
        let wave = (f64::from(x) / f64::from(width) * PI).sin()
            + (f64::from(y) / f64::from(height) * PI).cos();
        let noise = rng.random_range(-5.0..5.0);
        (wave * 20.0 + noise).max(0.0)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Borrow the patch at `pos`, which must be in bounds.
    #[must_use]
    pub fn patch(&self, pos: GridPos) -> &Patch {
        &self.cells[self.index(pos)]
    }

    /// Mutably borrow the patch at `pos`, which must be in bounds.
    pub fn patch_mut(&mut self, pos: GridPos) -> &mut Patch {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// Borrow the patch at `pos` if it is in bounds.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&Patch> {
        self.in_bounds(pos).then(|| self.patch(pos))
    }

    /// All positions in row-major order. This is the fixed per-tick
    /// iteration order of the patch pass.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| GridPos::new(x, y)))
    }

    /// In-bounds cells of the Moore neighborhood around `center`.
    #[must_use]
    pub fn moore_neighborhood(
        &self,
        center: GridPos,
        radius: i32,
        include_center: bool,
    ) -> Vec<GridPos> {
        let mut out = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }
                let pos = GridPos::new(center.x + dx, center.y + dy);
                if self.in_bounds(pos) {
                    out.push(pos);
                }
            }
        }
        out
    }

    /// Positions of every currently burning cell, in row-major order.
    #[must_use]
    pub fn burning_positions(&self) -> Vec<GridPos> {
        self.positions()
            .filter(|&pos| self.patch(pos).state == PatchState::Burning)
            .collect()
    }

    /// Number of cells currently in `state`.
    #[must_use]
    pub fn count_state(&self, state: PatchState) -> usize {
        self.cells.iter().filter(|p| p.state == state).count()
    }

    /// All border cells: the two full horizontal edges, then the remaining
    /// vertical edges. Firefighters start on a shuffled sample of these.
    #[must_use]
    pub fn border_positions(&self) -> Vec<GridPos> {
        let width = self.width as i32;
        let height = self.height as i32;
        let mut out = Vec::new();
        for x in 0..width {
            out.push(GridPos::new(x, 0));
            if height > 1 {
                out.push(GridPos::new(x, height - 1));
            }
        }
        for y in 1..height - 1 {
            out.push(GridPos::new(0, y));
            if width > 1 {
                out.push(GridPos::new(width - 1, y));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(kind: TerrainKind) -> TerrainGrid {
        let mut rng = SimRng::new(42);
        TerrainGrid::generate(20, 18, 0.8, 0.5, kind, &mut rng)
    }

    #[test]
    fn band_rows_are_inert_and_flat() {
        let road = grid(TerrainKind::RoadAndTrees);
        let road_row = 18 / 2;
        for x in 0..20 {
            for y in [road_row - 1, road_row, road_row + 1] {
                let patch = road.patch(GridPos::new(x, y));
                assert_eq!(patch.state, PatchState::Road);
                assert_eq!(patch.altitude, 0.0);
                assert_eq!(patch.flammability(), 0.0);
            }
        }

        let river = grid(TerrainKind::RiverAndTrees);
        let river_row = 18 / 3;
        for x in 0..20 {
            let patch = river.patch(GridPos::new(x, river_row));
            assert_eq!(patch.state, PatchState::River);
        }
    }

    #[test]
    fn density_one_forests_everything_outside_bands() {
        let mut rng = SimRng::new(1);
        let grid = TerrainGrid::generate(12, 12, 1.0, 0.5, TerrainKind::OnlyTrees, &mut rng);
        assert_eq!(grid.count_state(PatchState::Forested), 144);
        for pos in grid.positions() {
            let patch = grid.patch(pos);
            assert!(patch.species.is_some());
            assert!((5.0..15.0).contains(&patch.tree_height));
            assert!(patch.altitude >= 0.0);
        }
    }

    #[test]
    fn moore_neighborhood_clips_at_corners() {
        let grid = grid(TerrainKind::OnlyTrees);
        let corner = grid.moore_neighborhood(GridPos::new(0, 0), 1, false);
        assert_eq!(corner.len(), 3);
        let center = grid.moore_neighborhood(GridPos::new(5, 5), 1, true);
        assert_eq!(center.len(), 9);
    }

    #[test]
    fn border_count_matches_perimeter() {
        let grid = grid(TerrainKind::OnlyTrees);
        // 20x18 perimeter: 2*20 + 2*18 - 4
        assert_eq!(grid.border_positions().len(), 72);
        for pos in grid.border_positions() {
            assert!(
                pos.x == 0 || pos.y == 0 || pos.x == 19 || pos.y == 17,
                "{pos} is not on the border"
            );
        }
    }

    #[test]
    fn same_seed_generates_identical_terrain() {
        let mut a_rng = SimRng::new(9);
        let mut b_rng = SimRng::new(9);
        let a = TerrainGrid::generate(15, 15, 0.7, 0.3, TerrainKind::OnlyTrees, &mut a_rng);
        let b = TerrainGrid::generate(15, 15, 0.7, 0.3, TerrainKind::OnlyTrees, &mut b_rng);
        for pos in a.positions() {
            assert_eq!(a.patch(pos).state, b.patch(pos).state);
            assert_eq!(a.patch(pos).altitude, b.patch(pos).altitude);
        }
    }
}
