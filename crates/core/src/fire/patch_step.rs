//! Per-tick patch automaton: the Dangered cooldown and the burning-cell
//! spread pass.
//!
//! Cells are visited in row-major order and each checks its own state at
//! visit time, so a cell ignited earlier in the same pass spreads in the
//! same tick if it sits later in the order. That read-after-write is
//! intentional; determinism comes from the fixed order and the shared RNG.

use crate::climate::Climate;
use crate::core_types::position::GridPos;
use crate::core_types::rng::SimRng;
use crate::fire::spread::{SpreadCoefficients, SpreadSource};
use crate::grid::patch::{PatchState, DANGERED_COOLDOWN};
use crate::grid::terrain::TerrainGrid;
use tracing::trace;

/// Advance one cell by one tick.
///
/// Burning cells that loft an ember this tick push their position onto
/// `ember_origins`; the model turns those into live embers at the end of
/// the patch pass so they fly on the *next* tick.
pub(crate) fn step_patch(
    pos: GridPos,
    grid: &mut TerrainGrid,
    climate: &Climate,
    coeffs: &SpreadCoefficients,
    rng: &mut SimRng,
    ember_origins: &mut Vec<GridPos>,
) {
    match grid.patch(pos).state {
        PatchState::Dangered => step_dangered(pos, grid),
        PatchState::Burning => step_burning(pos, grid, climate, coeffs, rng, ember_origins),
        _ => {}
    }
}

/// Count down the at-risk cooldown; revert to Forested when it survives
/// the full window without igniting.
fn step_dangered(pos: GridPos, grid: &mut TerrainGrid) {
    let patch = grid.patch_mut(pos);
    patch.dangered_ticks += 1;
    if patch.dangered_ticks >= DANGERED_COOLDOWN {
        patch.state = PatchState::Forested;
        patch.dangered_ticks = 0;
    }
}

fn step_burning(
    pos: GridPos,
    grid: &mut TerrainGrid,
    climate: &Climate,
    coeffs: &SpreadCoefficients,
    rng: &mut SimRng,
    ember_origins: &mut Vec<GridPos>,
) {
    // First burning tick: roll the burn window from the species range.
    let source = {
        let patch = grid.patch_mut(pos);
        if patch.burn_countdown.is_none() {
            let ticks = patch
                .species
                .map_or(5, |species| species.roll_burn_ticks(rng));
            patch.burn_countdown = Some(ticks);
        }
        SpreadSource {
            pos,
            altitude: patch.altitude,
            tree_height: patch.tree_height,
        }
    };

    spread_to_neighbors(source, grid, climate, coeffs, rng);

    // A burning cell lofts at most one ember per tick.
    if rng.bernoulli(coeffs.ember_spawn) {
        trace!(source = %pos, "ember lofted");
        ember_origins.push(pos);
    }

    let patch = grid.patch_mut(pos);
    if let Some(countdown) = patch.burn_countdown.as_mut() {
        *countdown -= 1;
        if *countdown <= 0 {
            patch.extinguish();
        }
    }
}

/// Push ignition attempts onto every ignitable cell within the Euclidean
/// spread radius. Failed attempts still leave the target Dangered.
fn spread_to_neighbors(
    source: SpreadSource,
    grid: &mut TerrainGrid,
    climate: &Climate,
    coeffs: &SpreadCoefficients,
    rng: &mut SimRng,
) {
    let radius = climate.spread_radius();
    let radius_f = f64::from(radius);

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            let target = GridPos::new(source.pos.x + dx, source.pos.y + dy);
            if !grid.in_bounds(target) {
                continue;
            }
            // Euclidean disc, not the full bounding box.
            let distance = source.pos.distance(target);
            if distance > radius_f {
                continue;
            }
            let target_patch = grid.patch(target);
            if !target_patch.state.is_ignitable() {
                continue;
            }
            let probability = coeffs.ignition_probability(
                climate,
                source,
                target,
                target_patch.flammability(),
                distance,
            );
            let target_patch = grid.patch_mut(target);
            if rng.bernoulli(probability) {
                target_patch.ignite();
            } else {
                target_patch.mark_dangered();
            }
        }
    }
}
