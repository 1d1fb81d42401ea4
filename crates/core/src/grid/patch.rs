//! One cell of the terrain grid.
//!
//! A patch is a tiny state machine. The only legal transitions are:
//!
//! ```text
//! Forested ⇄ Dangered          (spread near-miss / 10-tick cooldown)
//! Forested | Dangered → Burning (spread, ember, start_fire)
//! Burning → Burned              (countdown expiry or extinguishing)
//! any non-Burning/River/Firebreak → Firebreak (firefighter line work)
//! ```
//!
//! Empty, Road and River never change spontaneously; Burned is terminal.

use crate::core_types::species::Species;
use serde::{Deserialize, Serialize};

/// Combustion state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchState {
    /// Bare ground, nothing to burn.
    Empty,
    /// Live vegetation, may ignite.
    Forested,
    /// Vegetation a spread pass nearly ignited; reverts to Forested after
    /// a cooldown unless ignited first.
    Dangered,
    /// On fire.
    Burning,
    /// Burnt out. Terminal, never combustible again.
    Burned,
    /// Paved band, inert.
    Road,
    /// Water band, inert and never accepts a firebreak.
    River,
    /// Cleared by a firefighter; fire cannot ignite or cross it.
    Firebreak,
}

impl PatchState {
    /// Whether a spread pass may target this cell.
    #[must_use]
    pub fn is_ignitable(self) -> bool {
        matches!(self, PatchState::Forested | PatchState::Dangered)
    }
}

/// Number of ticks a Dangered cell survives without igniting before it
/// reverts to Forested.
pub(crate) const DANGERED_COOLDOWN: u32 = 10;

/// Per-cell simulation state plus the static attributes fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub state: PatchState,
    /// Vegetation species; `None` on non-vegetated cells.
    pub species: Option<Species>,
    /// Tree height, drawn once for forested cells, 0 elsewhere.
    pub tree_height: f64,
    /// Procedural altitude, fixed at creation (0 on road/river bands).
    pub altitude: f64,
    /// Remaining burning ticks. `None` means "unset": the next burning
    /// tick rolls it from the species range.
    pub burn_countdown: Option<i32>,
    /// Ticks spent in the Dangered state since the last (re-)entry.
    pub dangered_ticks: u32,
}

impl Patch {
    /// A forested cell with the given species, tree height and altitude.
    #[must_use]
    pub fn forested(species: Species, tree_height: f64, altitude: f64) -> Self {
        Patch {
            state: PatchState::Forested,
            species: Some(species),
            tree_height,
            altitude,
            burn_countdown: None,
            dangered_ticks: 0,
        }
    }

    /// A bare cell at the given altitude.
    #[must_use]
    pub fn empty(altitude: f64) -> Self {
        Patch {
            state: PatchState::Empty,
            species: None,
            tree_height: 0.0,
            altitude,
            burn_countdown: None,
            dangered_ticks: 0,
        }
    }

    /// An inert cell belonging to a road or river band (altitude 0).
    #[must_use]
    pub fn band(state: PatchState) -> Self {
        Patch {
            state,
            species: None,
            tree_height: 0.0,
            altitude: 0.0,
            burn_countdown: None,
            dangered_ticks: 0,
        }
    }

    /// Flammability multiplier of this cell, 0 when non-vegetated.
    #[must_use]
    pub fn flammability(&self) -> f64 {
        self.species.map_or(0.0, Species::flammability)
    }

    /// Set the cell on fire with its countdown unset, so the next burning
    /// tick (re)rolls it from the species range.
    pub fn ignite(&mut self) {
        self.state = PatchState::Burning;
        self.burn_countdown = None;
        self.dangered_ticks = 0;
    }

    /// Force the cell to Burned (countdown expiry, extinguishing, or
    /// `stop_fire`).
    pub fn extinguish(&mut self) {
        self.state = PatchState::Burned;
        self.burn_countdown = None;
    }

    /// Mark the cell as at-risk. A fresh transition from Forested starts the
    /// cooldown at zero; a cell already Dangered keeps its running timer.
    pub fn mark_dangered(&mut self) {
        if self.state == PatchState::Forested {
            self.state = PatchState::Dangered;
            self.dangered_ticks = 0;
        }
    }

    /// Whether a firefighter may convert this cell into a firebreak.
    /// Burning cells, rivers and existing firebreaks are rejected.
    #[must_use]
    pub fn accepts_firebreak(&self) -> bool {
        !matches!(
            self.state,
            PatchState::Burning | PatchState::River | PatchState::Firebreak
        )
    }

    /// Palette code used by rendering hosts, matching the historical
    /// NetLogo-style color table.
    #[must_use]
    pub fn visual_code(&self) -> u8 {
        match self.state {
            PatchState::Empty => 0,
            PatchState::Burned => 5,
            PatchState::Burning => 15,
            PatchState::Firebreak => 25,
            PatchState::Dangered => 45,
            PatchState::Forested => match self.species {
                Some(Species::Eucalyptus) => 75,
                _ => 55,
            },
            PatchState::Road => 85,
            PatchState::River => 95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignite_resets_countdown_and_cooldown() {
        let mut patch = Patch::forested(Species::Pine, 10.0, 5.0);
        patch.mark_dangered();
        patch.dangered_ticks = 7;
        patch.ignite();
        assert_eq!(patch.state, PatchState::Burning);
        assert_eq!(patch.burn_countdown, None);
        assert_eq!(patch.dangered_ticks, 0);
    }

    #[test]
    fn mark_dangered_does_not_reset_running_timer() {
        let mut patch = Patch::forested(Species::Pine, 10.0, 5.0);
        patch.mark_dangered();
        patch.dangered_ticks = 4;
        patch.mark_dangered();
        assert_eq!(patch.dangered_ticks, 4, "re-marking must not reset");
    }

    #[test]
    fn firebreak_rejections() {
        let mut patch = Patch::forested(Species::Eucalyptus, 8.0, 0.0);
        assert!(patch.accepts_firebreak());
        patch.ignite();
        assert!(!patch.accepts_firebreak());
        patch.extinguish();
        assert!(patch.accepts_firebreak(), "burned ground still takes a line");

        assert!(!Patch::band(PatchState::River).accepts_firebreak());
        assert!(Patch::band(PatchState::Road).accepts_firebreak());
    }

    #[test]
    fn visual_codes_follow_palette() {
        assert_eq!(Patch::empty(0.0).visual_code(), 0);
        assert_eq!(Patch::forested(Species::Pine, 5.0, 0.0).visual_code(), 55);
        assert_eq!(
            Patch::forested(Species::Eucalyptus, 5.0, 0.0).visual_code(),
            75
        );
        assert_eq!(Patch::band(PatchState::Road).visual_code(), 85);
        assert_eq!(Patch::band(PatchState::River).visual_code(), 95);

        let mut patch = Patch::forested(Species::Pine, 5.0, 0.0);
        patch.mark_dangered();
        assert_eq!(patch.visual_code(), 45);
        patch.ignite();
        assert_eq!(patch.visual_code(), 15);
        patch.extinguish();
        assert_eq!(patch.visual_code(), 5);
    }

    #[test]
    fn flammability_zero_without_vegetation() {
        assert_eq!(Patch::empty(3.0).flammability(), 0.0);
        assert_eq!(Patch::band(PatchState::River).flammability(), 0.0);
        assert!(Patch::forested(Species::Pine, 5.0, 0.0).flammability() > 0.0);
    }
}
