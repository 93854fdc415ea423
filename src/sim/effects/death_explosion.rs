//! Ship death: particle burst, fade to black, "You Died", wait for respawn

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::particle::{Particle, advance_all};
use super::{Effect, progress};
use crate::consts::*;
use crate::from_angle;
use crate::render::{DrawContext, colors, with_alpha};
use crate::sim::camera::Camera;

pub const DEATH_TEXT: &str = "You Died";
pub const RESPAWN_HINT: &str = "click to respawn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeathPhase {
    #[default]
    Inactive,
    Explosion,
    Fading,
    Text,
    Waiting,
}

/// Issued when the player confirms a respawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respawn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathExplosion {
    phase: DeathPhase,
    timer: u32,
    particles: Vec<Particle>,
    origin: Vec2,
    fade_opacity: f32,
    text_opacity: f32,
    text_scale: f32,
    /// Terminal death: no text, no respawn
    game_over: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathVisuals {
    pub phase: DeathPhase,
    pub origin: Vec2,
    pub fade_opacity: f32,
    pub text_opacity: f32,
    pub text_scale: f32,
    pub show_text: bool,
    pub particles: Vec<Particle>,
}

impl Default for DeathExplosion {
    fn default() -> Self {
        Self {
            phase: DeathPhase::Inactive,
            timer: 0,
            particles: Vec::new(),
            origin: Vec2::ZERO,
            fade_opacity: 0.0,
            text_opacity: 0.0,
            text_scale: 1.0,
            game_over: false,
        }
    }
}

fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> crate::render::Rgba {
    colors::EXPLOSION_PALETTE[rng.random_range(0..colors::EXPLOSION_PALETTE.len())]
}

impl DeathExplosion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blow up at `origin`. `radial` particles fan out evenly (30% as line
    /// shards); `scatter` slower dots fill the center.
    pub fn trigger<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        game_over: bool,
        radial: usize,
        scatter: usize,
        rng: &mut R,
    ) {
        let mut particles = Vec::with_capacity(radial + scatter);

        for i in 0..radial {
            let angle = TAU * i as f32 / radial as f32 + (rng.random::<f32>() - 0.5) * 0.5;
            let speed = 8.0 + rng.random::<f32>() * 15.0;
            let size = 1.5 + rng.random::<f32>() * 5.0;
            let color = pick_color(rng);
            let line = rng.random_bool(0.3);
            let life = 60.0 + rng.random::<f32>() * 30.0;
            let mut p = Particle::dot(origin, from_angle(angle) * speed, life, size, color);
            if line {
                p.line_length = Some(8.0 + rng.random::<f32>() * 12.0);
                p.angle = angle;
            }
            particles.push(p);
        }

        for _ in 0..scatter {
            let angle = rng.random::<f32>() * PI * 2.0;
            let speed = 3.0 + rng.random::<f32>() * 8.0;
            let size = 1.0 + rng.random::<f32>() * 3.0;
            let color = pick_color(rng);
            let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 20.0;
            let life = 45.0 + rng.random::<f32>() * 25.0;
            particles.push(Particle::dot(origin + jitter, from_angle(angle) * speed, life, size, color));
        }

        *self = Self {
            phase: DeathPhase::Explosion,
            particles,
            origin,
            game_over,
            ..Self::default()
        };
    }

    /// Leave the waiting phase. Returns `None` before the sequence has
    /// finished or when the death ended the run.
    pub fn confirm(&mut self) -> Option<Respawn> {
        if self.phase != DeathPhase::Waiting || self.game_over {
            return None;
        }
        self.reset();
        Some(Respawn)
    }

    /// [`confirm`](Self::confirm), running `on_respawn` if it succeeds
    pub fn confirm_with<F: FnOnce(Respawn)>(&mut self, on_respawn: F) -> bool {
        match self.confirm() {
            Some(r) => {
                on_respawn(r);
                true
            }
            None => false,
        }
    }

    pub fn phase(&self) -> DeathPhase {
        self.phase
    }

    pub fn is_waiting(&self) -> bool {
        self.phase == DeathPhase::Waiting
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn visuals(&self) -> Option<DeathVisuals> {
        self.is_active().then(|| DeathVisuals {
            phase: self.phase,
            origin: self.origin,
            fade_opacity: self.fade_opacity,
            text_opacity: self.text_opacity,
            text_scale: self.text_scale,
            show_text: self.shows_text(),
            particles: self.particles.clone(),
        })
    }

    fn shows_text(&self) -> bool {
        matches!(self.phase, DeathPhase::Text | DeathPhase::Waiting) && !self.game_over
    }

    fn enter(&mut self, phase: DeathPhase) {
        self.phase = phase;
        self.timer = 0;
    }
}

impl Effect for DeathExplosion {
    fn is_active(&self) -> bool {
        self.phase != DeathPhase::Inactive
    }

    fn update(&mut self) {
        if !self.is_active() || self.is_waiting() {
            return;
        }
        self.timer += 1;

        match self.phase {
            DeathPhase::Inactive | DeathPhase::Waiting => {}
            DeathPhase::Explosion => {
                advance_all(&mut self.particles, 0.95);
                if self.timer >= DEATH_EXPLOSION_TIME {
                    self.enter(DeathPhase::Fading);
                }
            }
            DeathPhase::Fading => {
                self.fade_opacity = progress(self.timer, DEATH_FADE_TIME);
                if self.timer >= DEATH_FADE_TIME {
                    self.particles.clear();
                    self.enter(DeathPhase::Text);
                }
            }
            DeathPhase::Text => {
                let t = progress(self.timer, DEATH_TEXT_TIME);
                self.text_opacity = t;
                self.text_scale = if t < 0.5 { 1.5 - t } else { 1.0 };
                if self.timer >= DEATH_TEXT_TIME {
                    self.enter(DeathPhase::Waiting);
                }
            }
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera) {
        if !self.is_active() {
            return;
        }
        for p in &self.particles {
            p.draw(ctx, camera);
        }
        if self.fade_opacity > 0.0 {
            ctx.fill_screen(with_alpha(colors::BLACK, self.fade_opacity));
        }
        if self.shows_text() {
            let center = ctx.viewport() / 2.0;
            ctx.text(
                DEATH_TEXT,
                center - Vec2::new(0.0, 40.0),
                48.0 * self.text_scale,
                with_alpha(colors::WHITE, self.text_opacity),
            );
            ctx.text(
                RESPAWN_HINT,
                center + Vec2::new(0.0, 20.0),
                24.0,
                with_alpha(colors::SUBTITLE, self.text_opacity),
            );
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
