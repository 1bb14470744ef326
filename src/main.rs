//! Deflector entry point
//!
//! Runs the simulation headless: loads settings, places the configured
//! obstacles one by one, and advances fixed ticks while logging statistics.

use std::path::PathBuf;
use std::process::ExitCode;

use deflector::Point;
use deflector::Settings;
use deflector::sim::{Color, Obstacle, SimState, tick};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Deflector (headless) starting...");

    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    run(&settings);
    ExitCode::SUCCESS
}

fn run(settings: &Settings) {
    let mut state = SimState::new(settings);

    for placement in &settings.obstacles {
        let center = Point::from_array(placement.center);
        let radius = placement.radius.unwrap_or(settings.obstacle_radius);
        state.insert_obstacle(Obstacle::new(
            center,
            radius,
            placement.attenuation,
            Color::BLACK,
        ));
    }
    log::info!("{} obstacles placed", state.obstacles().len());

    let dt = settings.timestep;
    let total_ticks = (settings.duration / dt).round() as u64;
    let ticks_per_report = ((settings.stats_period / dt).round() as u64).max(1);
    let ticks_per_display = ((settings.display_period / dt).round() as u64).max(1);

    for t in 1..=total_ticks {
        tick(&mut state, dt);

        if t % ticks_per_display == 0 {
            log::debug!("frame {}: {} particles", t / ticks_per_display, state.particles.len());
        }

        if t % ticks_per_report == 0 {
            let stats = state.take_stats();
            log::info!(
                "t={:.2}s: {} particles, {} distance evaluations, {} rebounds, {} emitted, {} culled",
                t as f64 * dt,
                state.particles.len(),
                stats.distance_tests,
                stats.collisions,
                stats.emitted,
                stats.culled,
            );
        }
    }

    log::info!(
        "Finished after {} ticks with {} live particles",
        state.time_ticks,
        state.particles.len()
    );
}
