//! Headless platformer runner
//!
//! Runs the world at the configured tick rate for a number of ticks (first
//! argument, default 600) with a scripted input sequence, rendering every
//! frame into a command recorder.

use platform_engine::config::Config;
use platform_engine::foundation::logging;
use platform_engine::foundation::time::Stopwatch;
use platform_engine::input::{InputManager, KeyCode};
use platform_engine::render::CommandRecorder;
use platformer::{GameConfig, GameWorld, CONFIG_PATH};

const DEFAULT_TICKS: u64 = 600;

/// Key presses and releases applied at a given tick
fn scripted_input(tick: u64, input: &mut InputManager, world: &mut GameWorld) {
    match tick {
        0 => {
            input.handle_key_input(KeyCode::Right, true);
        }
        60 => {
            input.handle_key_input(KeyCode::Up, true);
        }
        70 => {
            input.handle_key_input(KeyCode::Up, false);
            input.handle_key_input(KeyCode::Space, true);
        }
        71 => {
            input.handle_key_input(KeyCode::Space, false);
        }
        180 => {
            input.handle_key_input(KeyCode::Right, false);
            input.handle_key_input(KeyCode::Left, true);
        }
        300 => {
            input.handle_key_input(KeyCode::Left, false);
            world.on_key_released(KeyCode::Q);
        }
        _ => {}
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::load_or_default(CONFIG_PATH)?;
    logging::init_with_filter(&config.engine.log_level);

    let ticks = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => DEFAULT_TICKS,
    };
    let delta_time = config.engine.tick_duration();
    log::info!("Running {} ticks at {} Hz", ticks, config.engine.tick_rate);

    let mut world = GameWorld::new(config);
    world.init()?;
    world.resize(800.0, 600.0);

    let mut input = InputManager::new();
    let mut recorder = CommandRecorder::new();
    let stopwatch = Stopwatch::start_new();
    let (mut spawned, mut removed) = (0, 0);

    for tick in 0..ticks {
        scripted_input(tick, &mut input, &mut world);
        let report = world.update(input.state(true), delta_time);
        spawned += report.spawned;
        removed += report.removed;

        recorder.clear();
        world.render(&mut recorder);
    }

    log::info!(
        "Simulated {:.2}s in {:?}: {} spawned, {} removed, {} live objects ({} enemies), {} draw commands in last frame",
        world.time(),
        stopwatch.elapsed(),
        spawned,
        removed,
        world.scene().len(),
        world.enemy_count(),
        recorder.commands().len()
    );

    world.shutdown();
    Ok(())
}
