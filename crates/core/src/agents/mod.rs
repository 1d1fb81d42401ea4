//! Dynamic agents living on top of the terrain grid: wind-carried embers
//! and firefighter crews.

pub mod ember;
pub mod firefighter;

pub use ember::{Ember, EmberCoefficients, EmberId};
pub use firefighter::{Firefighter, FirefighterMode, Technique};
