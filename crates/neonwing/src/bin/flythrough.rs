//! # Headless Flythrough
//!
//! Flies a scripted path through the city at a fixed tick rate without a
//! window or GPU, then logs streaming and timing figures.
//!
//! ```text
//! RUST_LOG=info cargo run --release --bin flythrough -- --seconds 120 --speed 250
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use neonwing::procedural::{CityConfig, CityError};
use neonwing::{FlightLoopBuilder, FlightLoopConfig, FlightResult, MeshBudgetSink, ScriptedFlight};
use tracing::{error, info};

/// NEONWING headless flythrough
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// City config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Forward speed in world units per second
    #[arg(long, default_value_t = 120.0)]
    speed: f32,

    /// Simulated flight time in seconds
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Starting world Z
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    start_z: f32,

    /// Turn around once this world Z is reached
    #[arg(long, allow_negative_numbers = true)]
    reverse_at: Option<f32>,

    /// Fixed tick rate
    #[arg(long, default_value_t = 90)]
    fps: u32,

    /// Warn about ticks that exceed the frame budget
    #[arg(long, default_value_t = false)]
    timing_logs: bool,
}

fn run(args: &Args) -> FlightResult<()> {
    let city = match &args.config {
        Some(path) => CityConfig::from_toml_file(path).map_err(CityError::from)?,
        None => CityConfig::default(),
    };

    let mut flight = ScriptedFlight::new(args.start_z, args.speed);
    if let Some(z) = args.reverse_at {
        flight = flight.reversing_at(z);
    }

    let fps = args.fps.max(1);
    let mut flight_loop = FlightLoopBuilder::new(city)
        .config(FlightLoopConfig {
            target_fps: fps,
            enable_timing_logs: args.timing_logs,
        })
        .position_feed(flight)
        .geometry_sink(MeshBudgetSink::new())
        .build()?;

    let dt = 1.0 / fps as f32;
    #[allow(clippy::cast_sign_loss)]
    let ticks = (args.seconds.max(0.0) * fps as f32).round() as u64;
    for _ in 0..ticks {
        flight_loop.tick(dt)?;
    }

    let city = flight_loop.city().stats();
    let sink = flight_loop.sink();
    info!(
        final_z = flight_loop.player_z(),
        chunk = ?flight_loop.city().current_index(),
        generated = city.generated_this_session,
        retired = city.retired_this_session,
        peak_active = city.peak_active,
        buildings = city.buildings_generated,
        roads = city.roads_generated,
        "Flythrough complete"
    );
    info!(
        resident_chunks = sink.resident_chunks(),
        resident_vertices = sink.resident_vertices(),
        resident_kib = sink.resident_vertex_bytes() / 1024,
        peak_vertices = sink.peak_vertices(),
        "Geometry budget"
    );
    flight_loop.stats().log_summary();

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    info!(?args, "Starting NEONWING flythrough");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Flythrough failed");
            ExitCode::FAILURE
        }
    }
}
