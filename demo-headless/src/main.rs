use clap::Parser;
use gridfire_core::{
    analysis, Degrees, GridPos, SimRng, Simulation, SimulationConfig, TerrainKind,
};
use tracing::info;

/// Headless wildfire simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "gridfire-demo")]
#[command(about = "Grid wildfire simulation demo", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 50)]
    width: u32,

    /// Grid height in cells
    #[arg(long, default_value_t = 50)]
    height: u32,

    /// Forest density (0-1)
    #[arg(short, long, default_value_t = 0.7)]
    density: f64,

    /// Eucalyptus share of forested cells (0-1)
    #[arg(long, default_value_t = 0.5)]
    eucalyptus: f64,

    /// Terrain layout (trees, road, river)
    #[arg(long, default_value = "trees")]
    terrain: String,

    /// Number of firefighter crews on the border
    #[arg(short, long, default_value_t = 8)]
    firefighters: u32,

    /// Share of crews using water (0-1); the rest build firebreaks
    #[arg(long, default_value_t = 0.5)]
    water_ratio: f64,

    /// Wind speed
    #[arg(short, long, default_value_t = 2.0)]
    wind_speed: f64,

    /// Wind direction in degrees (0 = north, 90 = east)
    #[arg(long, default_value_t = 0.0)]
    wind_direction: f64,

    /// Rain level (0-1)
    #[arg(long, default_value_t = 0.0)]
    rain: f64,

    /// Relative humidity
    #[arg(long, default_value_t = 40.0)]
    humidity: f64,

    /// Let the weather drift randomly between ticks
    #[arg(long)]
    drift: bool,

    /// Number of simultaneous ignition points
    #[arg(short, long, default_value_t = 1)]
    ignitions: u32,

    /// Ticks to simulate
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 10)]
    report_interval: u64,

    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let terrain = match args.terrain.as_str() {
        "road" => TerrainKind::RoadAndTrees,
        "river" => TerrainKind::RiverAndTrees,
        _ => TerrainKind::OnlyTrees,
    };

    let mut config = SimulationConfig {
        width: args.width,
        height: args.height,
        density: args.density,
        eucalyptus_share: args.eucalyptus,
        terrain,
        firefighter_count: args.firefighters,
        water_ratio: args.water_ratio,
        seed: args.seed,
        ..SimulationConfig::default()
    };
    config.climate.wind_speed = args.wind_speed;
    config.climate.wind_direction = Degrees::new(args.wind_direction);
    config.climate.rain_level = args.rain;
    config.climate.humidity = args.humidity;

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    for _ in 0..args.ignitions {
        if let Some(pos) = sim.start_fire() {
            println!("ignition at {pos}");
        }
    }

    // Weather drift is host-driven, so it gets its own RNG stream and the
    // simulation's replay stays tied to its seed alone.
    let mut weather_rng = SimRng::new(args.seed.wrapping_add(1));
    let report_interval = args.report_interval.max(1);

    for _ in 0..args.ticks {
        sim.step();
        if args.drift {
            let tick = sim.tick();
            sim.climate_mut().ambient_drift(&mut weather_rng, tick);
        }

        if sim.tick() % report_interval == 0 {
            let stats = sim.stats();
            println!(
                "tick {:>5}  burning {:>4}  burned {:>5}  dangered {:>4}  embers {:>3}  crews {:>3}  temp {:>6.1}  air {:?}",
                stats.tick,
                stats.burning,
                stats.burned,
                stats.dangered,
                stats.embers,
                stats.firefighters,
                stats.temperature,
                stats.air_status,
            );
        }

        if sim.stats().burning == 0 && sim.stats().embers == 0 && sim.tick() > 1 {
            info!(tick = sim.tick(), "fire burned out");
            break;
        }
    }

    let stats = sim.stats();
    let lines = analysis::group_firebreak_lines(sim.firebreak_history());
    let longest = lines.iter().map(Vec::len).max().unwrap_or(0);
    let embers_flown = sim.ember_history().len();
    let ignitions: Vec<GridPos> = sim.ignition_history().to_vec();

    println!();
    println!("=== final report (tick {}) ===", stats.tick);
    println!("ignition points:   {ignitions:?}");
    println!("forested:          {}", stats.forested);
    println!("dangered:          {}", stats.dangered);
    println!("burned:            {}", stats.burned);
    println!("firebreak cells:   {}", stats.firebreaks);
    println!("firebreak lines:   {} (longest {longest})", lines.len());
    println!("embers launched:   {embers_flown}");
    println!("surviving crews:   {}", stats.firefighters);
    println!(
        "air: CO {:.2}  CO2 {:.1}  PM2.5 {:.1}  PM10 {:.1}  O2 {:.0}  [{:?}]",
        stats.co, stats.co2, stats.pm2_5, stats.pm10, stats.o2, stats.air_status
    );
}
