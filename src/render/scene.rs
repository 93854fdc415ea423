//! Whole-frame composition
//!
//! Back to front: stars (or streaks), pickups, asteroids, bullets, ship,
//! crosshair, then effect overlays.

use glam::Vec2;

use super::{DrawContext, colors};
use crate::sim::effects::Effect;
use crate::sim::state::GameState;

const CROSSHAIR_SIZE: f32 = 8.0;

impl GameState {
    /// Draw the current frame. Nothing is drawn before a run starts.
    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        if !self.started {
            return;
        }
        let camera = &self.camera;

        if self.hyperspace.is_streaking() {
            self.hyperspace.draw_streaks(ctx, camera, &self.starfield.stars);
        } else {
            self.starfield.draw(ctx, camera, self.hyperspace.star_brightness());
        }

        for pickup in &self.pickups {
            pickup.draw(ctx, camera);
        }
        let asteroid_opacity = self.hyperspace.asteroid_opacity();
        for asteroid in &self.asteroids {
            asteroid.draw(ctx, camera, asteroid_opacity);
        }
        for bullet in &self.bullets {
            bullet.draw(ctx, camera);
        }
        self.ship
            .draw(ctx, camera, self.time_ms, self.hyperspace.ship_opacity());

        if !self.ship.destroyed {
            let c = camera.world_to_screen(self.crosshair);
            let dx = Vec2::new(CROSSHAIR_SIZE, 0.0);
            let dy = Vec2::new(0.0, CROSSHAIR_SIZE);
            ctx.line(c - dx, c + dx, 1.5, colors::CROSSHAIR);
            ctx.line(c - dy, c + dy, 1.5, colors::CROSSHAIR);
        }

        self.level_up.draw(ctx, camera);
        self.stage_clear.draw(ctx, camera);
        self.hyperspace.draw(ctx, camera);
        self.death.draw(ctx, camera);
    }
}
