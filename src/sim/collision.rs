//! Collision detection and world wrapping
//!
//! Everything collides as a circle: position + radius. Rotation and polygon
//! silhouettes are purely visual.

use glam::Vec2;

/// Anything that can take part in a circle-overlap test
pub trait Collider {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Circle-overlap test.
///
/// Touching circles (`distance == radius_sum`) do NOT collide; only strict
/// overlap counts. The test is symmetric in its arguments.
#[inline]
pub fn check_collision<A: Collider + ?Sized, B: Collider + ?Sized>(a: &A, b: &B) -> bool {
    circles_overlap(a.position(), a.radius(), b.position(), b.radius())
}

/// Raw form of [`check_collision`]
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let sum = ra + rb;
    a.distance_squared(b) < sum * sum
}

/// Wrap a position into the toroidal world.
///
/// Leaving one edge re-enters at the opposite edge. The result always lies in
/// `[0, width] x [0, height]` (boundary inclusive).
#[inline]
pub fn wrap_position(pos: Vec2, world: Vec2) -> Vec2 {
    let mut p = pos;
    if p.x < 0.0 {
        p.x = world.x;
    } else if p.x > world.x {
        p.x = 0.0;
    }
    if p.y < 0.0 {
        p.y = world.y;
    } else if p.y > world.y {
        p.y = 0.0;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Dot(Vec2, f32);

    impl Collider for Dot {
        fn position(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    #[test]
    fn test_overlapping_circles_collide() {
        assert!(check_collision(&Dot(Vec2::ZERO, 5.0), &Dot(Vec2::new(7.0, 0.0), 5.0)));
    }

    #[test]
    fn test_distant_circles_do_not_collide() {
        assert!(!check_collision(&Dot(Vec2::ZERO, 5.0), &Dot(Vec2::new(20.0, 0.0), 5.0)));
    }

    #[test]
    fn test_touching_circles_do_not_collide() {
        // distance == radius sum is treated as a miss
        assert!(!check_collision(&Dot(Vec2::ZERO, 5.0), &Dot(Vec2::new(10.0, 0.0), 5.0)));
        assert!(check_collision(&Dot(Vec2::ZERO, 5.0), &Dot(Vec2::new(9.999, 0.0), 5.0)));
    }

    #[test]
    fn test_wrap_teleports_to_opposite_edge() {
        let world = Vec2::new(100.0, 100.0);
        assert_eq!(wrap_position(Vec2::new(-1.0, 101.0), world), Vec2::new(100.0, 0.0));
        assert_eq!(wrap_position(Vec2::new(50.0, 50.0), world), Vec2::new(50.0, 50.0));
        // Exactly on the boundary is inside
        assert_eq!(wrap_position(Vec2::new(100.0, 0.0), world), Vec2::new(100.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_wrap_stays_in_world(x in -500.0f32..8500.0, y in -500.0f32..6000.0) {
            let world = Vec2::new(8000.0, 5500.0);
            let p = wrap_position(Vec2::new(x, y), world);
            prop_assert!(p.x >= 0.0 && p.x <= world.x);
            prop_assert!(p.y >= 0.0 && p.y <= world.y);
        }

        #[test]
        fn prop_collision_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, ar in 0.0f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, br in 0.0f32..50.0,
        ) {
            let a = Dot(Vec2::new(ax, ay), ar);
            let b = Dot(Vec2::new(bx, by), br);
            prop_assert_eq!(check_collision(&a, &b), check_collision(&b, &a));
        }
    }
}
