//! Terrain grid and per-cell state.

pub mod patch;
pub mod terrain;

pub use patch::{Patch, PatchState};
pub use terrain::{TerrainGrid, TerrainKind};
