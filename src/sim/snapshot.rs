//! Read-only views of the simulation for renderers and the HUD

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{DeathVisuals, HyperspaceVisuals, LevelUpVisuals, StageClearVisuals};
use super::entities::{Asteroid, AsteroidSize, Bullet, Pickup, Ship};
use super::state::{GameMode, GameState};
use crate::format_time;

/// Live asteroids by size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AsteroidCounts {
    pub large: u32,
    pub medium: u32,
    pub small: u32,
}

impl AsteroidCounts {
    pub fn tally(asteroids: &[Asteroid]) -> Self {
        asteroids.iter().fold(Self::default(), |mut c, a| {
            match a.size {
                AsteroidSize::Large => c.large += 1,
                AsteroidSize::Medium => c.medium += 1,
                AsteroidSize::Small => c.small += 1,
            }
            c
        })
    }

    pub fn total(&self) -> u32 {
        self.large + self.medium + self.small
    }
}

/// Stats frozen at the moment the run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    pub stage: u32,
    pub level: u32,
    pub score: u64,
    pub time_ms: f64,
}

impl FinalStats {
    /// Run time as `HH:MM:SS`
    pub fn time_string(&self) -> String {
        format_time(self.time_ms)
    }
}

/// Everything the HUD shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub mode: GameMode,
    pub started: bool,
    pub paused: bool,
    pub score: u64,
    pub currency: u64,
    pub lives: u32,
    pub xp: u64,
    pub level: u32,
    pub xp_required: u64,
    pub stage: u32,
    pub elapsed_ms: f64,
    pub time_string: String,
    /// Remaining ms before the hyperspace jump (0 when not armed)
    pub hyper_countdown_ms: f64,
    pub asteroid_counts: AsteroidCounts,
    pub bullets: usize,
    pub max_bullets: usize,
    pub game_over: bool,
    pub final_stats: Option<FinalStats>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraView {
    pub pos: Vec2,
    pub zoom: f32,
    pub viewport: Vec2,
}

/// Draw-ready world state for an external renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub time_ms: f64,
    /// `None` while the ship is destroyed
    pub ship: Option<Ship>,
    pub ship_invulnerable: bool,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub camera: CameraView,
    pub crosshair: Vec2,
    pub ship_opacity: f32,
    pub asteroid_opacity: f32,
    pub level_up: Option<LevelUpVisuals>,
    pub stage_clear: Option<StageClearVisuals>,
    pub hyperspace: Option<HyperspaceVisuals>,
    pub death: Option<DeathVisuals>,
}

impl GameState {
    pub fn progress_snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            mode: self.mode,
            started: self.started,
            paused: self.paused,
            score: self.score,
            currency: self.progression.currency,
            lives: self.lives,
            xp: self.progression.xp,
            level: self.progression.level,
            xp_required: self.progression.required(),
            stage: self.stage,
            elapsed_ms: self.elapsed_ms,
            time_string: format_time(self.elapsed_ms),
            hyper_countdown_ms: self.hyper_countdown.remaining_ms(),
            asteroid_counts: self.asteroid_counts,
            bullets: self.bullets.len(),
            max_bullets: self.tuning.max_bullets,
            game_over: self.game_over,
            final_stats: self.final_stats,
        }
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            time_ms: self.time_ms,
            ship: (!self.ship.destroyed).then(|| self.ship.clone()),
            ship_invulnerable: self.ship.is_invulnerable(self.time_ms),
            asteroids: self.asteroids.clone(),
            bullets: self.bullets.clone(),
            pickups: self.pickups.clone(),
            camera: CameraView {
                pos: self.camera.pos,
                zoom: self.camera.zoom,
                viewport: self.camera.viewport,
            },
            crosshair: self.crosshair,
            ship_opacity: self.hyperspace.ship_opacity(),
            asteroid_opacity: self.hyperspace.asteroid_opacity(),
            level_up: self.level_up.visuals(),
            stage_clear: self.stage_clear.visuals(),
            hyperspace: self.hyperspace.visuals(),
            death: self.death.visuals(),
        }
    }
}
