//! The fire-spread cellular automaton.

pub mod patch_step;
pub mod spread;

pub use spread::{SpreadCoefficients, SpreadSource};
