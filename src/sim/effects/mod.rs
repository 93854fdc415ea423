//! Timer-driven visual state machines
//!
//! Each effect owns a phase enum, a frame counter that resets on every phase
//! transition, and its own transient particles. `update()` and `draw()` are
//! safe no-ops while inactive; triggering an active effect restarts it from
//! its first phase.

pub mod death_explosion;
pub mod hyperspace;
pub mod level_up;
pub mod particle;
pub mod stage_clear;

pub use death_explosion::{DeathExplosion, DeathPhase, DeathVisuals, Respawn};
pub use hyperspace::{HyperspaceJumpEffect, HyperspacePhase, HyperspaceVisuals, StageStart};
pub use level_up::{LevelUpEffect, LevelUpVisuals};
pub use particle::Particle;
pub use stage_clear::{StageClearEffect, StageClearPhase, StageClearVisuals};

use super::camera::Camera;
use crate::render::DrawContext;

/// Common contract for every effect
pub trait Effect {
    fn is_active(&self) -> bool;

    /// Advance one animation frame
    fn update(&mut self);

    /// Render overlays and particles; nothing when inactive
    fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera);

    /// Drop all phase state, timers and particles
    fn reset(&mut self);

    /// Advance `frames` animation frames
    fn step(&mut self, frames: u32) {
        for _ in 0..frames {
            self.update();
        }
    }
}

/// Linear progress of `timer` through a phase of `duration` frames, in 0..=1
#[inline]
pub(crate) fn progress(timer: u32, duration: u32) -> f32 {
    if duration == 0 {
        1.0
    } else {
        (timer as f32 / duration as f32).min(1.0)
    }
}
