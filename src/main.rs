//! Astro Drift headless driver
//!
//! Runs a scripted session against the simulation and prints the HUD
//! snapshot as JSON. Usage: `astro-drift [seed] [tuning.json]`.

use std::process::ExitCode;

use glam::Vec2;

use astro_drift::consts::FRAME_MS;
use astro_drift::render::DrawList;
use astro_drift::sim::{GameMode, GameState, TickInput, tick};
use astro_drift::Tuning;

/// Simulated session length (one minute at 60 Hz)
const SESSION_FRAMES: u32 = 60 * 60;

fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

/// Circle the crosshair around the ship and hold fire, thrusting in bursts
fn scripted_input(state: &GameState, frame: u32) -> TickInput {
    let angle = frame as f32 * 0.02;
    TickInput {
        thrust: frame % 120 < 30,
        fire_held: true,
        aim: Some(state.ship.pos + Vec2::new(angle.cos(), angle.sin()) * 200.0),
        confirm: frame % 60 == 0,
        ..Default::default()
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => 1,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let tuning = match load_tuning(args.next().as_deref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut state = GameState::with_tuning(seed, tuning);
    state.start_run(GameMode::Waves);

    for frame in 0..SESSION_FRAMES {
        let input = scripted_input(&state, frame);
        tick(&mut state, &input, FRAME_MS);
        if state.game_over {
            break;
        }
    }

    let mut frame = DrawList::new(state.camera.viewport);
    state.draw(&mut frame);
    log::info!("Final frame: {} draw commands", frame.len());

    match serde_json::to_string_pretty(&state.progress_snapshot()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {e}");
            ExitCode::FAILURE
        }
    }
}
