//! "STAGE CLEAR" banner: slide in, pop, hold, fade

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Effect, progress};
use crate::consts::*;
use crate::render::{DrawContext, colors, with_alpha};
use crate::sim::camera::Camera;

pub const STAGE_CLEAR_TEXT: &str = "STAGE CLEAR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageClearPhase {
    #[default]
    Inactive,
    Sliding,
    Popping,
    Holding,
    Fading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageClearEffect {
    phase: StageClearPhase,
    timer: u32,
    /// Horizontal offset from screen center (px)
    offset_x: f32,
    scale: f32,
    opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageClearVisuals {
    pub phase: StageClearPhase,
    pub offset_x: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Default for StageClearEffect {
    fn default() -> Self {
        Self {
            phase: StageClearPhase::Inactive,
            timer: 0,
            offset_x: -STAGE_CLEAR_SLIDE_DISTANCE,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl StageClearEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&mut self) {
        *self = Self {
            phase: StageClearPhase::Sliding,
            ..Self::default()
        };
    }

    pub fn phase(&self) -> StageClearPhase {
        self.phase
    }

    pub fn visuals(&self) -> Option<StageClearVisuals> {
        self.is_active().then_some(StageClearVisuals {
            phase: self.phase,
            offset_x: self.offset_x,
            scale: self.scale,
            opacity: self.opacity,
        })
    }

    fn enter(&mut self, phase: StageClearPhase) {
        self.phase = phase;
        self.timer = 0;
    }
}

impl Effect for StageClearEffect {
    fn is_active(&self) -> bool {
        self.phase != StageClearPhase::Inactive
    }

    fn update(&mut self) {
        if !self.is_active() {
            return;
        }
        self.timer += 1;

        match self.phase {
            StageClearPhase::Inactive => {}
            StageClearPhase::Sliding => {
                let t = progress(self.timer, STAGE_CLEAR_SLIDE_TIME);
                self.offset_x = -STAGE_CLEAR_SLIDE_DISTANCE * (1.0 - t);
                if self.timer >= STAGE_CLEAR_SLIDE_TIME {
                    self.enter(StageClearPhase::Popping);
                }
            }
            StageClearPhase::Popping => {
                let t = progress(self.timer, STAGE_CLEAR_POP_TIME);
                self.scale = if t < 0.5 {
                    1.0 + 0.3 * (t * 2.0)
                } else {
                    1.3 - 0.3 * ((t - 0.5) * 2.0)
                };
                if self.timer >= STAGE_CLEAR_POP_TIME {
                    self.scale = 1.0;
                    self.enter(StageClearPhase::Holding);
                }
            }
            StageClearPhase::Holding => {
                if self.timer >= STAGE_CLEAR_HOLD_TIME {
                    self.enter(StageClearPhase::Fading);
                }
            }
            StageClearPhase::Fading => {
                self.opacity = 1.0 - progress(self.timer, STAGE_CLEAR_FADE_TIME);
                if self.timer >= STAGE_CLEAR_FADE_TIME {
                    self.enter(StageClearPhase::Inactive);
                }
            }
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext, _camera: &Camera) {
        if !self.is_active() {
            return;
        }
        let at = ctx.viewport() / 2.0 + Vec2::new(self.offset_x, 0.0);
        let size = 72.0 * self.scale;
        // Gold outline pass under the white fill
        ctx.text(STAGE_CLEAR_TEXT, at, size, with_alpha(colors::STAGE_CLEAR_GOLD, self.opacity));
        ctx.text(STAGE_CLEAR_TEXT, at, size, with_alpha(colors::WHITE, self.opacity));
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_sequence() {
        let mut fx = StageClearEffect::new();
        fx.trigger();
        assert_eq!(fx.phase(), StageClearPhase::Sliding);

        fx.step(STAGE_CLEAR_SLIDE_TIME);
        assert_eq!(fx.phase(), StageClearPhase::Popping);
        assert_eq!(fx.visuals().map(|v| v.offset_x), Some(0.0));

        fx.step(STAGE_CLEAR_POP_TIME);
        assert_eq!(fx.phase(), StageClearPhase::Holding);

        fx.step(STAGE_CLEAR_HOLD_TIME);
        assert_eq!(fx.phase(), StageClearPhase::Fading);

        fx.step(STAGE_CLEAR_FADE_TIME);
        assert!(!fx.is_active());
    }

    #[test]
    fn test_pop_overshoots() {
        let mut fx = StageClearEffect::new();
        fx.trigger();
        fx.step(STAGE_CLEAR_SLIDE_TIME + 7);
        let scale = fx.visuals().map(|v| v.scale).unwrap_or_default();
        assert!(scale > 1.2 && scale <= 1.3);
    }

    #[test]
    fn test_retrigger_restarts_slide() {
        let mut fx = StageClearEffect::new();
        fx.trigger();
        fx.step(50);
        fx.trigger();
        assert_eq!(fx.phase(), StageClearPhase::Sliding);
        assert_eq!(fx.visuals().map(|v| v.offset_x), Some(-STAGE_CLEAR_SLIDE_DISTANCE));
    }

    #[test]
    fn test_update_while_inactive_is_noop() {
        let mut fx = StageClearEffect::new();
        fx.step(10);
        assert_eq!(fx.phase(), StageClearPhase::Inactive);
    }
}
