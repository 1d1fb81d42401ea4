//! Firefighter crews: the suppression / firebreak state machine.
//!
//! Two techniques share one chassis:
//!
//! - **Water** crews attack fire directly. Each tick they pump at every
//!   burning cell in their radius-1 Moore neighborhood, forcing a cell to
//!   Burned once it has absorbed enough hits. When nothing is in reach they
//!   advance one cell toward an upwind rendezvous point next to the nearest
//!   fire, so they approach from behind the smoke instead of walking into
//!   the front.
//! - **Technical** crews never touch the fire. They plan containment lines
//!   perpendicular to the fire's expected advance (a blend of
//!   fire-to-crew direction and wind), walk the line waypoint by waypoint
//!   and convert each reached cell into a Firebreak.
//!
//! The machine is deliberately free of randomness: given the same grid and
//! climate, a crew always makes the same decision.

use crate::climate::Climate;
use crate::core_types::position::GridPos;
use crate::grid::patch::PatchState;
use crate::grid::terrain::TerrainGrid;
use nalgebra::Vector2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use tracing::trace;

/// Suppression technique, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Technique {
    /// Direct attack with water.
    Water,
    /// Firebreak line construction.
    Technical,
}

/// Current behavior mode, exposed to rendering hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirefighterMode {
    /// At home with no fire anywhere.
    Idle,
    /// Moving toward a fire (water crews only).
    Navigating,
    /// Actively extinguishing adjacent cells.
    DirectAttack,
    /// Planning or working a containment line.
    Firebreak,
    /// No fire left, walking back to the home cell.
    ReturningHome,
    /// Caught by the fire; removed from the live set at the tick boundary.
    Dead,
}

/// Hits a water crew must land on one cell before it is forced to Burned.
const WATER_CAPACITY: u32 = 2;
/// Same threshold for technical crews (they rarely use it, but the original
/// crews carried less water).
const TECHNICAL_CAPACITY: u32 = 3;
/// Cells kept between the rendezvous point and the fire, against the wind.
const UPWIND_SAFE_DISTANCE: f64 = 3.0;
/// A line is abandoned after this many consecutive working ticks.
const MAX_CONSECUTIVE_EFFORT: u32 = 20;
/// Waypoint search gives up after this many offsets.
const WAYPOINT_SEARCH_ATTEMPTS: u32 = 10;
/// Lines shorter than this get one 90° re-orientation before giving up.
const SHORT_LINE_THRESHOLD: u32 = 5;
/// Maximum line length while the fire is expanding rapidly / calm.
const RAPID_LINE_LENGTH: u32 = 15;
const CALM_LINE_LENGTH: u32 = 12;
/// Expansion detector: growth per tick and crowding that count as "rapid".
const RAPID_GROWTH_PER_TICK: usize = 2;
const RAPID_NEARBY_FIRES: usize = 3;
const RAPID_NEARBY_RADIUS: f64 = 8.0;
/// Below this distance to the fire centroid the line is placed between the
/// crew and the fire instead of behind the crew.
const NEAR_CENTROID_DISTANCE: f64 = 10.0;
/// The planned line center is clamped this many cells inside the border.
const CENTER_MARGIN: f64 = 2.0;
/// Burning-count samples kept by the expansion detector.
const EXPANSION_WINDOW: usize = 3;

/// Everything a crew needs to see and mutate during its step.
pub(crate) struct SuppressionCtx<'a> {
    pub grid: &'a mut TerrainGrid,
    pub climate: &'a Climate,
    /// Model-owned, ordered, duplicate-free log of every cell ever
    /// converted into a firebreak.
    pub firebreak_history: &'a mut Vec<GridPos>,
}

/// A planned containment line being worked point by point.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FirebreakPlan {
    /// Continuous center the line radiates from.
    center: Vector2<f64>,
    /// Line angle in radians.
    angle: f64,
    /// Cells converted so far on this line.
    length: u32,
    /// Longest this line may grow.
    max_length: u32,
    /// Waypoint currently being walked to.
    target: GridPos,
}

/// One suppression crew.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firefighter {
    position: GridPos,
    home: GridPos,
    technique: Technique,
    mode: FirefighterMode,
    extinguish_capacity: u32,
    extinguish_progress: FxHashMap<GridPos, u32>,
    plan: Option<FirebreakPlan>,
    consecutive_effort: u32,
    recent_fire_counts: Vec<usize>,
    path: Vec<GridPos>,
}

impl Firefighter {
    /// Station a new crew at `position` (also its home).
    #[must_use]
    pub fn new(position: GridPos, technique: Technique) -> Self {
        let extinguish_capacity = match technique {
            Technique::Water => WATER_CAPACITY,
            Technique::Technical => TECHNICAL_CAPACITY,
        };
        Firefighter {
            position,
            home: position,
            technique,
            mode: FirefighterMode::Idle,
            extinguish_capacity,
            extinguish_progress: FxHashMap::default(),
            plan: None,
            consecutive_effort: 0,
            recent_fire_counts: Vec::new(),
            path: vec![position],
        }
    }

    #[must_use]
    pub fn position(&self) -> GridPos {
        self.position
    }

    #[must_use]
    pub fn home(&self) -> GridPos {
        self.home
    }

    #[must_use]
    pub fn technique(&self) -> Technique {
        self.technique
    }

    #[must_use]
    pub fn mode(&self) -> FirefighterMode {
        self.mode
    }

    /// Every cell this crew has stood on, in order.
    #[must_use]
    pub fn path(&self) -> &[GridPos] {
        &self.path
    }

    /// Accumulated hits per target cell (water crews).
    #[must_use]
    pub fn extinguish_progress(&self) -> &FxHashMap<GridPos, u32> {
        &self.extinguish_progress
    }

    /// Advance the crew by one tick.
    pub(crate) fn step(&mut self, ctx: &mut SuppressionCtx<'_>) {
        self.path.push(self.position);

        // Standing on fire is fatal, whatever the crew was doing.
        if ctx.grid.patch(self.position).state == PatchState::Burning {
            self.mode = FirefighterMode::Dead;
            trace!(pos = %self.position, "crew caught by the fire");
            return;
        }

        let fires = ctx.grid.burning_positions();
        if fires.is_empty() {
            self.clear_plan();
            self.recent_fire_counts.clear();
            if self.position == self.home {
                self.mode = FirefighterMode::Idle;
            } else {
                self.mode = FirefighterMode::ReturningHome;
                self.walk_toward(self.home, ctx.grid);
            }
            return;
        }

        match self.technique {
            Technique::Water => self.step_water(&fires, ctx),
            Technique::Technical => self.step_technical(&fires, ctx),
        }
    }

    fn clear_plan(&mut self) {
        self.plan = None;
        self.consecutive_effort = 0;
    }

    // ------------------------------------------------------------------
    // Water technique
    // ------------------------------------------------------------------

    fn step_water(&mut self, fires: &[GridPos], ctx: &mut SuppressionCtx<'_>) {
        if self.pump_at_neighbors(ctx.grid) {
            self.mode = FirefighterMode::DirectAttack;
        } else {
            // still hauling hose: keep closing in even while hits accumulate
            self.mode = FirefighterMode::Navigating;
            self.advance_upwind(fires, ctx);
        }
    }

    /// Hit every burning cell in the radius-1 Moore neighborhood (own cell
    /// included). Returns whether any cell was fully extinguished.
    fn pump_at_neighbors(&mut self, grid: &mut TerrainGrid) -> bool {
        let mut extinguished = false;
        for neighbor in grid.moore_neighborhood(self.position, 1, true) {
            if grid.patch(neighbor).state != PatchState::Burning {
                continue;
            }
            let hits = self.extinguish_progress.entry(neighbor).or_insert(0);
            *hits += 1;
            if *hits >= self.extinguish_capacity {
                grid.patch_mut(neighbor).extinguish();
                self.extinguish_progress.remove(&neighbor);
                extinguished = true;
                trace!(cell = %neighbor, "cell extinguished");
            }
        }
        extinguished
    }

    /// One step toward the nearest fire, approaching via a rendezvous point
    /// a few cells upwind of it whenever that point is the closer goal.
    fn advance_upwind(&mut self, fires: &[GridPos], ctx: &mut SuppressionCtx<'_>) {
        let Some(&fire) = fires
            .iter()
            .min_by(|a, b| {
                self.position
                    .distance(**a)
                    .total_cmp(&self.position.distance(**b))
            })
        else {
            return;
        };

        let wind = ctx.climate.wind_vector();
        let wind_step = GridPos::new(wind.x.round() as i32, wind.y.round() as i32);
        let rendezvous = GridPos::new(
            fire.x - wind_step.x * UPWIND_SAFE_DISTANCE as i32,
            fire.y - wind_step.y * UPWIND_SAFE_DISTANCE as i32,
        )
        .clamped(ctx.grid.width(), ctx.grid.height());

        let goal = if self.position.distance(rendezvous) < self.position.distance(fire) {
            rendezvous
        } else {
            fire
        };
        self.walk_toward(goal, ctx.grid);
    }

    /// Move one 8-way step toward `target`, refusing to enter a burning or
    /// out-of-bounds cell.
    fn walk_toward(&mut self, target: GridPos, grid: &TerrainGrid) {
        let next = self.position.step_toward(target);
        if next != self.position
            && grid.in_bounds(next)
            && grid.patch(next).state != PatchState::Burning
        {
            self.position = next;
        }
    }

    // ------------------------------------------------------------------
    // Technical technique
    // ------------------------------------------------------------------

    fn step_technical(&mut self, fires: &[GridPos], ctx: &mut SuppressionCtx<'_>) {
        // A crew already committed to a line keeps working it until the
        // line completes, stalls out, or the effort cap trips.
        if self.mode == FirefighterMode::Firebreak && self.plan.is_some() {
            self.consecutive_effort += 1;
            let exhausted = self
                .plan
                .as_ref()
                .is_some_and(|plan| plan.length >= plan.max_length)
                || self.consecutive_effort >= MAX_CONSECUTIVE_EFFORT;
            if exhausted {
                trace!(pos = %self.position, "containment line finished");
                self.clear_plan();
                return;
            }
            self.work_line(ctx);
            return;
        }

        let rapid = self.update_expansion_window(fires);
        self.plan_line(fires, rapid, ctx.climate, ctx.grid);
        self.mode = FirefighterMode::Firebreak;
    }

    /// Track the burning-cell count over the last few ticks and decide
    /// whether the fire is expanding rapidly: the count grew by 2+ in a
    /// tick, or 3+ fires crowd within distance 8 of the crew.
    fn update_expansion_window(&mut self, fires: &[GridPos]) -> bool {
        let current = fires.len();
        let growing = self
            .recent_fire_counts
            .last()
            .is_some_and(|&previous| current >= previous + RAPID_GROWTH_PER_TICK);

        self.recent_fire_counts.push(current);
        if self.recent_fire_counts.len() > EXPANSION_WINDOW {
            self.recent_fire_counts.remove(0);
        }

        let crowded = fires
            .iter()
            .filter(|&&fire| self.position.distance(fire) <= RAPID_NEARBY_RADIUS)
            .count()
            >= RAPID_NEARBY_FIRES;

        growing || crowded
    }

    /// Plan a containment line perpendicular to the fire's expected
    /// advance direction.
    fn plan_line(&mut self, fires: &[GridPos], rapid: bool, climate: &Climate, grid: &TerrainGrid) {
        let me = self.position.as_vector();
        let centroid = fires
            .iter()
            .fold(Vector2::zeros(), |acc, f| acc + f.as_vector())
            / fires.len() as f64;

        // Expected advance: the fire pushes toward the crew, bent by wind.
        let toward_me = me - centroid;
        let centroid_distance = toward_me.norm();
        let wind = climate.wind_vector();
        let advance = if centroid_distance > 0.0 {
            let blended = 0.6 * (toward_me / centroid_distance) + 0.4 * wind;
            let norm = blended.norm();
            if norm > 0.0 {
                blended / norm
            } else {
                blended
            }
        } else {
            wind
        };

        // Perpendicular to the advance, snapped to a cardinal axis when
        // already close to one.
        let mut angle = advance.y.atan2(advance.x) + FRAC_PI_2;
        let degrees = angle.to_degrees().rem_euclid(360.0);
        if (80.0..=100.0).contains(&degrees) || (260.0..=280.0).contains(&degrees) {
            angle = FRAC_PI_2;
        } else if degrees <= 10.0 || degrees >= 350.0 || (170.0..=190.0).contains(&degrees) {
            angle = 0.0;
        }

        let raw_center = if centroid_distance < NEAR_CENTROID_DISTANCE {
            // close to the fire: put the line a fifth of the way toward it
            me + 0.2 * (centroid - me)
        } else {
            // far away: anchor the line a few cells behind the crew
            me - advance * UPWIND_SAFE_DISTANCE
        };
        let center = Vector2::new(
            clamp_with_margin(raw_center.x, grid.width()),
            clamp_with_margin(raw_center.y, grid.height()),
        );

        let max_length = if rapid {
            RAPID_LINE_LENGTH
        } else {
            CALM_LINE_LENGTH
        };

        let mut plan_center = center;
        let mut plan_angle = angle;
        let mut target = line_point(plan_center, plan_angle, 0.0, grid);
        if target.is_none() {
            // degenerate geometry: fall back to a vertical line next to us
            plan_center = Vector2::new(me.x + 1.0, me.y);
            plan_angle = FRAC_PI_2;
            target = line_point(plan_center, plan_angle, 0.0, grid);
        }

        self.consecutive_effort = 0;
        self.plan = target.map(|target| {
            trace!(pos = %self.position, target = %target, rapid, "containment line planned");
            FirebreakPlan {
                center: plan_center,
                angle: plan_angle,
                length: 0,
                max_length,
                target,
            }
        });
    }

    /// Work the current line: convert the reached waypoint, find the next
    /// one, or walk toward the waypoint dodging fire.
    fn work_line(&mut self, ctx: &mut SuppressionCtx<'_>) {
        let Some(mut plan) = self.plan.take() else {
            return;
        };

        if self.position != plan.target {
            self.walk_line_segment(plan.target, ctx.grid);
            self.plan = Some(plan);
            return;
        }

        // On the waypoint: convert it if the cell allows.
        if mark_firebreak(self.position, ctx) {
            plan.length += 1;
            trace!(cell = %self.position, length = plan.length, "firebreak cell placed");
        }

        // Find the next workable waypoint further out on the line.
        let mut offset = self.position.as_vector().metric_distance(&plan.center);
        let mut next = None;
        for _ in 0..WAYPOINT_SEARCH_ATTEMPTS {
            offset += 1.0;
            match line_point(plan.center, plan.angle, offset, ctx.grid) {
                Some(point) if ctx.grid.patch(point).accepts_firebreak() => {
                    next = Some(point);
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }

        if let Some(next) = next {
            if plan.length < plan.max_length {
                plan.target = next;
                self.plan = Some(plan);
                return;
            }
        } else if plan.length < SHORT_LINE_THRESHOLD {
            // A line that stalled almost immediately gets one chance in the
            // perpendicular direction before the crew re-plans.
            plan.angle += FRAC_PI_2;
            if let Some(point) = line_point(plan.center, plan.angle, 1.0, ctx.grid) {
                if ctx.grid.patch(point).accepts_firebreak() {
                    plan.target = point;
                    self.plan = Some(plan);
                    return;
                }
            }
        }

        // Line complete or stuck: drop the plan so next tick re-plans.
        self.clear_plan();
    }

    /// One step toward the waypoint, with the four axis neighbors as
    /// fallbacks when the diagonal path is blocked by fire.
    fn walk_line_segment(&mut self, target: GridPos, grid: &TerrainGrid) {
        let next = self.position.step_toward(target);
        if grid.in_bounds(next) && grid.patch(next).state != PatchState::Burning {
            self.position = next;
            return;
        }
        let GridPos { x, y } = self.position;
        for fallback in [
            GridPos::new(x + 1, y),
            GridPos::new(x - 1, y),
            GridPos::new(x, y + 1),
            GridPos::new(x, y - 1),
        ] {
            if grid.in_bounds(fallback) && grid.patch(fallback).state != PatchState::Burning {
                self.position = fallback;
                return;
            }
        }
    }
}

/// Clamp a line-center coordinate a couple of cells inside the border.
fn clamp_with_margin(value: f64, dimension: u32) -> f64 {
    let limit = f64::from(dimension) - 1.0;
    let low = CENTER_MARGIN.min(limit);
    let high = (f64::from(dimension) - CENTER_MARGIN - 1.0).max(low);
    value.clamp(low, high)
}

/// The grid cell at `offset` along the line, if it is in bounds.
fn line_point(
    center: Vector2<f64>,
    angle: f64,
    offset: f64,
    grid: &TerrainGrid,
) -> Option<GridPos> {
    let point = GridPos::rounded(
        center.x + offset * angle.cos(),
        center.y + offset * angle.sin(),
    );
    grid.in_bounds(point).then_some(point)
}

/// Convert a cell into a firebreak, recording it in the model history.
/// Burning cells, rivers and existing firebreaks are rejected.
fn mark_firebreak(pos: GridPos, ctx: &mut SuppressionCtx<'_>) -> bool {
    let patch = ctx.grid.patch_mut(pos);
    if !patch.accepts_firebreak() {
        return false;
    }
    patch.state = PatchState::Firebreak;
    if !ctx.firebreak_history.contains(&pos) {
        ctx.firebreak_history.push(pos);
    }
    true
}
