//! Smoke and air-quality aggregation.
//!
//! Five scalars track the atmosphere over the whole map. Each tick every
//! level relaxes toward a target derived from the number of burning cells,
//! so the readings lag the fire the way real sensors do. The classification
//! thresholds follow common AQI breakpoints.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Exponential smoothing factor shared by every level.
const SMOOTHING: f64 = 0.1;

const BASELINE_CO: f64 = 0.1;
const BASELINE_CO2: f64 = 400.0;
const BASELINE_PM2_5: f64 = 25.0;
const BASELINE_PM10: f64 = 10.0;
const BASELINE_O2: f64 = 21_000.0;
/// O₂ never drops below this, no matter how much is burning.
const MIN_O2: f64 = 15_000.0;

/// Coarse classification of the current air levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirStatus {
    Safe,
    Danger,
}

/// Map-wide pollutant levels, smoothed tick by tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQuality {
    /// Carbon monoxide, ppm.
    pub co: f64,
    /// Carbon dioxide, ppm.
    pub co2: f64,
    /// Fine particulates, µg/m³.
    pub pm2_5: f64,
    /// Coarse particulates, µg/m³.
    pub pm10: f64,
    /// Oxygen, ppm-scale.
    pub o2: f64,
}

impl Default for AirQuality {
    fn default() -> Self {
        AirQuality {
            co: BASELINE_CO,
            co2: BASELINE_CO2,
            pm2_5: BASELINE_PM2_5,
            pm10: BASELINE_PM10,
            o2: BASELINE_O2,
        }
    }
}

impl AirQuality {
    /// Relax every level one step toward its target for `burning_count`
    /// simultaneously burning cells. Targets scale linearly with the count
    /// except O₂, which is floored.
    pub fn update(&mut self, burning_count: usize) {
        let b = burning_count as f64;
        relax(&mut self.co, BASELINE_CO + 2.0 * b);
        relax(&mut self.co2, BASELINE_CO2 + 5.0 * b);
        relax(&mut self.pm2_5, BASELINE_PM2_5 + b);
        relax(&mut self.pm10, BASELINE_PM10 + b);
        relax(&mut self.o2, (BASELINE_O2 - 10.0 * b).max(MIN_O2));

        if self.status() == AirStatus::Danger {
            debug!(co = self.co, o2 = self.o2, "air quality in the danger band");
        }
    }

    /// Classify the current levels against the hazard thresholds.
    #[must_use]
    pub fn status(&self) -> AirStatus {
        let danger = self.o2 <= 20_000.0
            || self.co >= 10.0
            || self.co2 >= 1_000.0
            || self.pm10 >= 100.0
            || self.pm2_5 >= 100.0;
        if danger {
            AirStatus::Danger
        } else {
            AirStatus::Safe
        }
    }
}

fn relax(level: &mut f64, target: f64) {
    *level += (target - *level) * SMOOTHING;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn baseline_is_safe() {
        assert_eq!(AirQuality::default().status(), AirStatus::Safe);
    }

    #[test]
    fn levels_are_monotone_and_never_overshoot() {
        let mut air = AirQuality::default();
        let mut previous = air.clone();
        for _ in 0..500 {
            air.update(80);
            assert!(air.co >= previous.co && air.co <= BASELINE_CO + 2.0 * 80.0);
            assert!(air.co2 >= previous.co2 && air.co2 <= BASELINE_CO2 + 5.0 * 80.0);
            assert!(air.pm2_5 >= previous.pm2_5 && air.pm2_5 <= BASELINE_PM2_5 + 80.0);
            assert!(air.pm10 >= previous.pm10 && air.pm10 <= BASELINE_PM10 + 80.0);
            assert!(air.o2 <= previous.o2 && air.o2 >= BASELINE_O2 - 10.0 * 80.0);
            previous = air.clone();
        }
        assert_relative_eq!(air.co, BASELINE_CO + 160.0, epsilon = 1e-6);
        assert_relative_eq!(air.o2, BASELINE_O2 - 800.0, epsilon = 1e-6);
    }

    #[test]
    fn oxygen_stays_within_physical_bounds() {
        let mut air = AirQuality::default();
        for _ in 0..2_000 {
            air.update(100_000);
            assert!(air.o2 >= MIN_O2);
            assert!(air.o2 <= BASELINE_O2);
        }
        assert_relative_eq!(air.o2, MIN_O2, epsilon = 1e-6);
    }

    #[test]
    fn recovery_after_the_fire_goes_out() {
        let mut air = AirQuality::default();
        for _ in 0..300 {
            air.update(500);
        }
        assert_eq!(air.status(), AirStatus::Danger);
        for _ in 0..1_000 {
            air.update(0);
        }
        assert_eq!(air.status(), AirStatus::Safe);
        assert_relative_eq!(air.co2, BASELINE_CO2, epsilon = 1e-3);
    }

    #[test]
    fn each_threshold_trips_danger_alone() {
        let base = AirQuality::default();
        let mut a = base.clone();
        a.co = 10.0;
        assert_eq!(a.status(), AirStatus::Danger);
        let mut a = base.clone();
        a.co2 = 1_000.0;
        assert_eq!(a.status(), AirStatus::Danger);
        let mut a = base.clone();
        a.pm2_5 = 100.0;
        assert_eq!(a.status(), AirStatus::Danger);
        let mut a = base.clone();
        a.pm10 = 100.0;
        assert_eq!(a.status(), AirStatus::Danger);
        let mut a = base;
        a.o2 = 20_000.0;
        assert_eq!(a.status(), AirStatus::Danger);
    }
}
