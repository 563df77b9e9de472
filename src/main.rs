//! Spike Arena headless entry point
//!
//! Runs a scripted session against the simulation and prints the final frame
//! as JSON. Rendering and live input belong to a front end.
//!
//! Usage: `spike-arena [config.json] [seed]`

use std::path::Path;

use glam::Vec2;
use spike_arena::ArenaConfig;
use spike_arena::sim::{Command, ScriptedInput, SimEvent, TickInput, World, run_frame};

const DEFAULT_SEED: u64 = 0x5EED;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => ArenaConfig::load(Path::new(&path)),
        None => ArenaConfig::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({e}), using default");
            DEFAULT_SEED
        }
        None => DEFAULT_SEED,
    };

    log::info!("Spike Arena (headless) starting, seed={seed}");
    let mut world = World::new(config, seed);

    // Lock whatever spike sits above the spawn column, then shuffle the rest
    let lock_point = Vec2::new(world.spawn_point().x, 4.0);
    let mut script = ScriptedInput::new()
        .hold(TickInput::new(1, false), 60)
        .hold(TickInput::new(1, true), 1)
        .hold(TickInput::new(1, false), 40)
        .command(Command::ToggleLock(lock_point))
        .command(Command::Reroll)
        .command(Command::RegeneratePreservingLocked)
        .hold(TickInput::new(-1, false), 60)
        .hold(TickInput::new(-1, true), 1)
        .hold(TickInput::default(), 60)
        .command(Command::UnlockAll);

    let mut strikes = 0;
    while !script.is_finished() {
        run_frame(&mut world, &mut script);
        for event in &world.events {
            match event {
                SimEvent::HazardStruck { hazard } => {
                    strikes += 1;
                    log::info!("Tick {}: struck by spike {}", world.time_ticks, hazard);
                }
                SimEvent::Jumped => log::debug!("Tick {}: jump", world.time_ticks),
                SimEvent::Landed => log::debug!("Tick {}: landed", world.time_ticks),
            }
        }
    }

    log::info!(
        "Finished seed {} after {} ticks: {} spikes, {} strikes",
        world.seed,
        world.time_ticks,
        world.hazards.len(),
        strikes
    );

    match serde_json::to_string_pretty(&world.view()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize frame: {e}"),
    }
}
