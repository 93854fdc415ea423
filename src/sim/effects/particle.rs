use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::EPSILON;
use crate::render::{DrawContext, Rgba, with_alpha};
use crate::sim::camera::Camera;

/// Short-lived effect particle (world space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Rgba,
    /// Line particles are drawn as a segment of this length along `angle`
    pub line_length: Option<f32>,
    pub angle: f32,
}

impl Particle {
    pub fn dot(pos: Vec2, vel: Vec2, life: f32, size: f32, color: Rgba) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: life,
            size,
            color,
            line_length: None,
            angle: 0.0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life as an opacity
    #[inline]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life.max(EPSILON)).clamp(0.0, 1.0)
    }

    /// Move, damp and age by one frame
    pub fn advance(&mut self, damping: f32) {
        self.pos += self.vel;
        self.vel *= damping;
        self.life -= 1.0;
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: &Camera) {
        if !camera.is_visible(self.pos, self.size) {
            return;
        }
        let zoom = camera.zoom.max(EPSILON);
        let at = camera.world_to_screen(self.pos);
        let color = with_alpha(self.color, self.alpha());
        match self.line_length {
            Some(length) => {
                let end = at + crate::from_angle(self.angle) * (length / zoom);
                ctx.line(at, end, self.size / 2.0 / zoom, color);
            }
            None => ctx.circle(at, self.size / zoom, color),
        }
    }
}

/// Advance every particle and drop the dead ones
pub fn advance_all(particles: &mut Vec<Particle>, damping: f32) {
    for p in particles.iter_mut() {
        p.advance(damping);
    }
    particles.retain(Particle::is_alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colors;

    #[test]
    fn test_particles_die_and_are_dropped() {
        let mut ps = vec![
            Particle::dot(Vec2::ZERO, Vec2::X, 1.0, 2.0, colors::WHITE),
            Particle::dot(Vec2::ZERO, Vec2::X, 3.0, 2.0, colors::WHITE),
        ];
        advance_all(&mut ps, 0.5);
        assert_eq!(ps.len(), 1);
        assert_eq!(ps[0].pos, Vec2::X);
        assert_eq!(ps[0].vel, Vec2::X * 0.5);
        assert!((ps[0].alpha() - 2.0 / 3.0).abs() < 1e-6);
    }
}
