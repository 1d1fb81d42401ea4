//! Read-only exports for rendering and charting hosts.

use crate::agents::firefighter::{FirefighterMode, Technique};
use crate::air::AirStatus;
use crate::core_types::position::GridPos;
use crate::core_types::species::Species;
use crate::grid::patch::PatchState;
use serde::{Deserialize, Serialize};

/// One cell as a renderer sees it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub pos: GridPos,
    pub state: PatchState,
    pub species: Option<Species>,
    /// Palette code, see [`Patch::visual_code`](crate::grid::Patch::visual_code).
    pub visual_code: u8,
}

/// One crew as a renderer sees it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FirefighterSnapshot {
    pub position: GridPos,
    pub mode: FirefighterMode,
    pub technique: Technique,
}

/// Per-tick census for chart hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStats {
    pub tick: u64,
    pub forested: usize,
    pub dangered: usize,
    pub burning: usize,
    pub burned: usize,
    pub firebreaks: usize,
    /// Embers currently in flight.
    pub embers: usize,
    /// Crews still alive.
    pub firefighters: usize,
    pub temperature: f64,
    pub co: f64,
    pub co2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub o2: f64,
    pub air_status: AirStatus,
}
