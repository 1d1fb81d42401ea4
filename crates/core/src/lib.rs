//! Wildfire Grid Simulation Core Library
//!
//! A tick-driven cellular-automaton wildfire model over a discrete 2-D
//! terrain grid: probabilistic fire spread shaped by wind, humidity, rain,
//! altitude and vegetation, wind-carried embers that start spot fires,
//! firefighter crews that extinguish cells or cut firebreak lines, and an
//! air-quality aggregator tracking the smoke.
//!
//! The whole engine is single-threaded and deterministic: one seeded RNG,
//! one fixed iteration order per tick. Hosts drive it by calling
//! [`Simulation::step`] and reading snapshots between ticks.

// Shared primitives
pub mod core_types;

// World state
pub mod climate;
pub mod grid;

// The fire automaton and the agents living on top of it
pub mod agents;
pub mod fire;

// Aggregation and orchestration
pub mod air;
pub mod analysis;
pub mod simulation;

// Re-export the primitive types
pub use core_types::{Degrees, GridPos, SimRng, Species};

// Re-export the world state
pub use climate::Climate;
pub use grid::{Patch, PatchState, TerrainGrid, TerrainKind};

// Re-export the agents and fire model
pub use agents::{Ember, EmberCoefficients, EmberId, Firefighter, FirefighterMode, Technique};
pub use fire::SpreadCoefficients;

// Re-export the model surface
pub use air::{AirQuality, AirStatus};
pub use simulation::{
    CellSnapshot, ConfigError, FirefighterSnapshot, Simulation, SimulationConfig, SimulationStats,
};
