//! Collision geometry
//!
//! Every hit test in the game is a circle-circle overlap. Entity counts stay
//! small, so the resolver does a full pairwise scan without a broad phase.

use glam::Vec2;

/// Anything that occupies a circle on the playfield
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Check whether two circles overlap
///
/// Strict comparison: circles exactly `radius_a + radius_b` apart are touching,
/// not colliding.
#[inline]
pub fn is_collision(a: Vec2, b: Vec2, radius_a: f32, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Overlap test between two circular entities
#[inline]
pub fn circles_overlap(a: &impl Circle, b: &impl Circle) -> bool {
    is_collision(a.center(), b.center(), a.radius(), b.radius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_position_collides() {
        assert!(is_collision(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), 5.0, 20.0));
    }

    #[test]
    fn test_exact_touch_is_not_a_collision() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(25.0, 0.0);
        assert!(!is_collision(a, b, 5.0, 20.0));
        assert!(is_collision(a, Vec2::new(25.0 - 1e-3, 0.0), 5.0, 20.0));
    }

    #[test]
    fn test_diagonal_distance() {
        // 3-4-5 triangle
        let a = Vec2::ZERO;
        let b = Vec2::new(3.0, 4.0);
        assert!(is_collision(a, b, 2.5, 2.6));
        assert!(!is_collision(a, b, 2.5, 2.5));
    }

    #[test]
    fn test_far_apart() {
        assert!(!is_collision(Vec2::ZERO, Vec2::new(500.0, 500.0), 40.0, 40.0));
    }

    proptest! {
        #[test]
        fn prop_collision_is_stable_and_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
            ra in 1.0f32..60.0, rb in 1.0f32..60.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let first = is_collision(a, b, ra, rb);
            prop_assert_eq!(first, is_collision(a, b, ra, rb));
            prop_assert_eq!(first, is_collision(b, a, rb, ra));
        }

        #[test]
        fn prop_touching_is_not_overlapping(
            x in -500i32..500, y in -500i32..500,
            ra in 1u8..60, rb in 1u8..60, vertical in any::<bool>(),
        ) {
            // Whole numbers keep the offsets exact in f32
            let a = Vec2::new(x as f32, y as f32);
            let (ra, rb) = (ra as f32, rb as f32);
            let axis = if vertical { Vec2::Y } else { Vec2::X };
            let reach = ra + rb;
            prop_assert!(!is_collision(a, a + axis * reach, ra, rb));
            prop_assert!(is_collision(a, a + axis * (reach - 0.01), ra, rb));
        }
    }
}
