//! Shared primitive types used across the whole engine.

pub mod position;
pub mod rng;
pub mod species;
pub mod units;

pub use position::GridPos;
pub use rng::SimRng;
pub use species::Species;
pub use units::Degrees;
