//! Firefighter crews exercised through the public API: water squads putting
//! fires out, technical squads leaving firebreak lines behind.

use gridfire_core::{
    analysis, Climate, PatchState, Simulation, SimulationConfig,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Damp, windless weather: the fire creeps instead of flashing over,
/// which gives crews something to work against for many ticks.
fn damp_climate() -> Climate {
    Climate {
        temperature: 0.0,
        humidity: 500.0,
        rain_level: 0.8,
        wind_speed: 0.0,
        ..Climate::default()
    }
}

/// A water squad on a small map: the run must reach a quiet state (no
/// burning cells, no embers in flight) within a generous budget. The squad
/// can only shorten the burn, never prolong it.
#[test]
fn water_squad_reaches_a_quiet_state() {
    let config = SimulationConfig {
        width: 15,
        height: 15,
        density: 1.0,
        firefighter_count: 12,
        water_ratio: 1.0,
        seed: 11,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.start_fire().unwrap();

    let mut quiet = false;
    for _ in 0..500 {
        sim.step();
        let stats = sim.stats();
        if stats.burning == 0 && stats.embers == 0 {
            quiet = true;
            break;
        }
    }
    assert!(quiet, "the fire must be out within 500 ticks");
    assert!(sim.stats().burned >= 1);
}

/// Technical crews against a sustained fire leave real firebreak lines:
/// non-empty, duplicate-free history whose cells all read Firebreak.
#[test]
fn technical_crews_leave_firebreak_lines() {
    let config = SimulationConfig {
        width: 30,
        height: 30,
        density: 1.0,
        firefighter_count: 8,
        water_ratio: 0.0,
        seed: 17,
        climate: damp_climate(),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config).unwrap();

    // keep relighting so the crews always have a standing fire to plan
    // against
    for _ in 0..150 {
        if sim.stats().burning == 0 {
            sim.start_fire();
        }
        sim.step();
    }

    let history = sim.firebreak_history();
    assert!(
        !history.is_empty(),
        "150 ticks of standing fire must produce firebreak cells"
    );

    let mut deduped = history.to_vec();
    deduped.sort_by_key(|p| (p.x, p.y));
    deduped.dedup();
    assert_eq!(deduped.len(), history.len(), "history must be duplicate-free");

    for cell in sim.cells() {
        if history.contains(&cell.pos) {
            assert_eq!(cell.state, PatchState::Firebreak);
        }
    }
    assert_eq!(sim.stats().firebreaks, history.len());

    // grouping the history partitions it
    let lines = analysis::group_firebreak_lines(history);
    let grouped: usize = lines.iter().map(Vec::len).sum();
    assert_eq!(grouped, history.len());
}

/// Crews survive a mild fire on a sparse map more often than not; at the
/// very least the census never reports more crews than were hired.
#[test]
fn crew_census_never_exceeds_the_roster() {
    let config = SimulationConfig {
        width: 20,
        height: 20,
        density: 0.6,
        firefighter_count: 10,
        water_ratio: 0.5,
        seed: 23,
        climate: damp_climate(),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config).unwrap();
    sim.start_fire();

    let mut previous = sim.stats().firefighters;
    assert_eq!(previous, 10);
    for _ in 0..100 {
        sim.step();
        let current = sim.stats().firefighters;
        assert!(current <= previous, "dead crews never come back");
        previous = current;
    }
}
