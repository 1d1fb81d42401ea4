//! The simulation model: owns the grid, climate, agents and clock.
//!
//! `step()` is synchronous and single-threaded. Each tick runs in a fixed
//! order (patches, embers, firefighters, air, temperature) and all
//! randomness flows through one seeded RNG, so identical configs replay
//! identically. Agent set changes are staged: embers spawned during the
//! patch pass join the live set at the end of the tick, dead firefighters
//! leave it there.

pub mod config;
pub mod snapshot;

pub use config::{ConfigError, SimulationConfig};
pub use snapshot::{CellSnapshot, FirefighterSnapshot, SimulationStats};

use crate::agents::ember::{Ember, EmberId};
use crate::agents::firefighter::{Firefighter, FirefighterMode, SuppressionCtx, Technique};
use crate::air::AirQuality;
use crate::climate::Climate;
use crate::core_types::position::GridPos;
use crate::core_types::rng::SimRng;
use crate::fire::patch_step::step_patch;
use crate::grid::patch::PatchState;
use crate::grid::terrain::{TerrainGrid, TerrainKind};
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::mem;
use tracing::{debug, info};

/// Humidity multiplier applied once at construction on river maps.
const RIVER_HUMIDITY_BOOST: f64 = 1.5;

/// A complete wildfire simulation.
pub struct Simulation {
    config: SimulationConfig,
    grid: TerrainGrid,
    climate: Climate,
    air: AirQuality,
    embers: Vec<Ember>,
    next_ember_id: u32,
    firefighters: Vec<Firefighter>,
    rng: SimRng,
    tick: u64,
    ember_history: FxHashMap<EmberId, Vec<GridPos>>,
    firebreak_history: Vec<GridPos>,
    ignition_history: Vec<GridPos>,
}

impl Simulation {
    /// Build a simulation from a validated config.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SimRng::new(config.seed);
        let grid = TerrainGrid::generate(
            config.width,
            config.height,
            config.density,
            config.eucalyptus_share,
            config.terrain,
            &mut rng,
        );

        let mut climate = config.climate.clone();
        if config.terrain == TerrainKind::RiverAndTrees {
            climate.humidity *= RIVER_HUMIDITY_BOOST;
        }

        let firefighters = Self::station_firefighters(&config, &grid, &mut rng);

        info!(
            width = config.width,
            height = config.height,
            forested = grid.count_state(PatchState::Forested),
            firefighters = firefighters.len(),
            seed = config.seed,
            "simulation built"
        );

        Ok(Simulation {
            config,
            grid,
            climate,
            air: AirQuality::default(),
            embers: Vec::new(),
            next_ember_id: 0,
            firefighters,
            rng,
            tick: 0,
            ember_history: FxHashMap::default(),
            firebreak_history: Vec::new(),
            ignition_history: Vec::new(),
        })
    }

    /// Place crews on a shuffled sample of border cells. The first
    /// `water_ratio` share gets the water technique, the rest build lines.
    fn station_firefighters(
        config: &SimulationConfig,
        grid: &TerrainGrid,
        rng: &mut SimRng,
    ) -> Vec<Firefighter> {
        let mut border = grid.border_positions();
        border.shuffle(rng);

        let count = config.firefighter_count as usize;
        let water_count = (count as f64 * config.water_ratio).round() as usize;
        border
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(i, home)| {
                let technique = if i < water_count {
                    Technique::Water
                } else {
                    Technique::Technical
                };
                Firefighter::new(home, technique)
            })
            .collect()
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) {
        // 1. Patch automaton, row-major. Ember spawns are collected and
        // only become live agents at the end of the tick.
        let mut ember_origins = Vec::new();
        let positions: Vec<GridPos> = self.grid.positions().collect();
        for pos in positions {
            step_patch(
                pos,
                &mut self.grid,
                &self.climate,
                &self.config.spread,
                &mut self.rng,
                &mut ember_origins,
            );
        }

        // 2. Every live ember flies exactly once and is gone.
        for ember in mem::take(&mut self.embers) {
            ember.fly(
                &mut self.grid,
                &self.climate,
                &self.config.ember,
                &mut self.rng,
                &mut self.ember_history,
            );
        }

        // 3. Firefighters, in creation order. Dead crews leave the set at
        // the tick boundary.
        let mut crews = mem::take(&mut self.firefighters);
        {
            let mut ctx = SuppressionCtx {
                grid: &mut self.grid,
                climate: &self.climate,
                firebreak_history: &mut self.firebreak_history,
            };
            for crew in &mut crews {
                crew.step(&mut ctx);
            }
        }
        crews.retain(|crew| crew.mode() != FirefighterMode::Dead);
        self.firefighters = crews;

        // 4-5. Air and temperature track the burning census.
        let burning = self.grid.count_state(PatchState::Burning);
        self.air.update(burning);
        self.climate.relax_temperature(burning);

        // 6. Stage this tick's embers; they fly next tick.
        for origin in ember_origins {
            let id = EmberId(self.next_ember_id);
            self.next_ember_id += 1;
            self.embers.push(Ember::launch(
                id,
                origin,
                &self.climate,
                self.grid.width(),
                self.grid.height(),
                &mut self.rng,
            ));
        }

        self.tick += 1;
        debug!(
            tick = self.tick,
            burning,
            embers = self.embers.len(),
            firefighters = self.firefighters.len(),
            temperature = self.climate.temperature,
            "tick complete"
        );
    }

    /// Ignite a uniformly random forested cell and record where. Returns
    /// the position, or `None` when nothing is left to burn.
    pub fn start_fire(&mut self) -> Option<GridPos> {
        let forested: Vec<GridPos> = self
            .grid
            .positions()
            .filter(|&pos| self.grid.patch(pos).state == PatchState::Forested)
            .collect();
        if forested.is_empty() {
            return None;
        }
        let pos = forested[self.rng.random_range(0..forested.len())];
        self.grid.patch_mut(pos).ignite();
        self.ignition_history.push(pos);
        info!(pos = %pos, "fire started");
        Some(pos)
    }

    /// Ignite a specific cell if it is in bounds and currently ignitable.
    pub fn ignite_at(&mut self, pos: GridPos) -> bool {
        let ignitable = self
            .grid
            .get(pos)
            .is_some_and(|patch| patch.state.is_ignitable());
        if ignitable {
            self.grid.patch_mut(pos).ignite();
            self.ignition_history.push(pos);
            info!(pos = %pos, "fire started");
        }
        ignitable
    }

    /// Force every burning cell to Burned.
    pub fn stop_fire(&mut self) {
        let burning = self.grid.burning_positions();
        let count = burning.len();
        for pos in burning {
            self.grid.patch_mut(pos).extinguish();
        }
        if count > 0 {
            info!(extinguished = count, "all fires stopped");
        }
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    #[must_use]
    pub fn climate(&self) -> &Climate {
        &self.climate
    }

    /// Host-side weather edits between ticks (sliders, scripted fronts).
    pub fn climate_mut(&mut self) -> &mut Climate {
        &mut self.climate
    }

    /// Every cell in row-major order, renderer-shaped.
    #[must_use]
    pub fn cells(&self) -> Vec<CellSnapshot> {
        self.grid
            .positions()
            .map(|pos| {
                let patch = self.grid.patch(pos);
                CellSnapshot {
                    pos,
                    state: patch.state,
                    species: patch.species,
                    visual_code: patch.visual_code(),
                }
            })
            .collect()
    }

    /// Live crews, renderer-shaped.
    #[must_use]
    pub fn firefighters(&self) -> Vec<FirefighterSnapshot> {
        self.firefighters
            .iter()
            .map(|crew| FirefighterSnapshot {
                position: crew.position(),
                mode: crew.mode(),
                technique: crew.technique(),
            })
            .collect()
    }

    /// Flight path (origin, landing) of every ember that ever flew.
    #[must_use]
    pub fn ember_history(&self) -> &FxHashMap<EmberId, Vec<GridPos>> {
        &self.ember_history
    }

    /// Every cell ever converted to a firebreak, ordered, duplicate-free.
    #[must_use]
    pub fn firebreak_history(&self) -> &[GridPos] {
        &self.firebreak_history
    }

    /// Where each `start_fire`/`ignite_at` struck.
    #[must_use]
    pub fn ignition_history(&self) -> &[GridPos] {
        &self.ignition_history
    }

    /// Census of the current tick.
    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            tick: self.tick,
            forested: self.grid.count_state(PatchState::Forested),
            dangered: self.grid.count_state(PatchState::Dangered),
            burning: self.grid.count_state(PatchState::Burning),
            burned: self.grid.count_state(PatchState::Burned),
            firebreaks: self.grid.count_state(PatchState::Firebreak),
            embers: self.embers.len(),
            firefighters: self.firefighters.len(),
            temperature: self.climate.temperature,
            co: self.air.co,
            co2: self.air.co2,
            pm2_5: self.air.pm2_5,
            pm10: self.air.pm10,
            o2: self.air.o2,
            air_status: self.air.status(),
        }
    }
}
