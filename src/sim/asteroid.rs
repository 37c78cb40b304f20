//! Rotating asteroid hazards
//!
//! The outline and craters are generated once at construction in the
//! asteroid's local frame; the renderer re-projects them through
//! [`Asteroid::vertices`] and [`Asteroid::craters`] as the rock moves and spins.

use glam::Vec2;
use rand::Rng;

use super::collision::Circle;
use super::state::Playfield;
use crate::consts::*;
use crate::polar_to_cartesian;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidSize {
    Small,
    Large,
}

impl AsteroidSize {
    pub fn multiplier(self) -> f32 {
        match self {
            AsteroidSize::Small => 1.0,
            AsteroidSize::Large => 2.0,
        }
    }
}

/// One outline vertex in local polar coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    /// Degrees
    pub angle: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crater {
    /// Degrees
    pub angle: f32,
    pub distance: f32,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
    pub radius: f32,
    pub inner_radius: f32,
    /// Current rotation in degrees, kept in [0, 360)
    pub rotation: f32,
    /// Degrees per frame
    pub rotation_speed: f32,
    pub damage: i32,
    outline: Vec<OutlinePoint>,
    craters: Vec<Crater>,
}

impl Asteroid {
    pub fn new(pos: Vec2, size: AsteroidSize, rng: &mut impl Rng) -> Self {
        let mult = size.multiplier();
        let radius = ASTEROID_BASE_RADIUS * mult;
        let inner_radius = ASTEROID_INNER_RADIUS * mult;

        let heading = rng.random_range(0.0f32..360.0).to_radians();
        let speed = rng.random_range(2.0f32..=5.0);

        Self {
            pos,
            vel: polar_to_cartesian(speed, heading),
            size,
            radius,
            inner_radius,
            rotation: rng.random_range(0.0..360.0),
            rotation_speed: rng.random_range(-2.0..=2.0),
            damage: ASTEROID_DAMAGE,
            outline: Self::generate_outline(radius, rng),
            craters: Self::generate_craters(radius, inner_radius, mult, rng),
        }
    }

    fn generate_outline(radius: f32, rng: &mut impl Rng) -> Vec<OutlinePoint> {
        let count: usize = rng.random_range(8..=12);
        let step = 360.0 / count as f32;
        let jitter = step / 4.0;
        (0..count)
            .map(|i| OutlinePoint {
                angle: step * i as f32 + rng.random_range(-jitter..=jitter),
                distance: radius * rng.random_range(0.75..=1.25),
            })
            .collect()
    }

    fn generate_craters(radius: f32, inner_radius: f32, mult: f32, rng: &mut impl Rng) -> Vec<Crater> {
        let count = (rng.random_range(3..=5) as f32 * mult) as usize;
        (0..count)
            .map(|_| {
                let size = rng.random_range(8.0..=15.0) * mult;
                // Large craters on a small rock can invert the range
                let a = inner_radius + size;
                let b = radius - size;
                let (lo, hi) = (a.min(b), a.max(b));
                Crater {
                    angle: rng.random_range(0.0..360.0),
                    distance: rng.random_range(lo..=hi),
                    size,
                }
            })
            .collect()
    }

    /// Outline vertices in world space
    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.outline.iter().map(move |p| {
            self.pos + polar_to_cartesian(p.distance, (p.angle + self.rotation).to_radians())
        })
    }

    /// Crater centers and sizes in world space
    pub fn craters(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.craters.iter().map(move |c| {
            let center = self.pos + polar_to_cartesian(c.distance, (c.angle + self.rotation).to_radians());
            (center, c.size)
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.outline.len()
    }

    pub fn crater_count(&self) -> usize {
        self.craters.len()
    }

    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + self.rotation_speed).rem_euclid(360.0);
    }

    /// Move one frame, wrapping at the sides and top.
    ///
    /// Returns false once the asteroid has left through the bottom edge.
    pub fn advance(&mut self, field: &Playfield) -> bool {
        self.pos += self.vel;
        let r = self.radius;

        if self.pos.y > field.height + r {
            return false;
        }
        if self.pos.x < -r {
            self.pos.x = field.width + r;
        } else if self.pos.x > field.width + r {
            self.pos.x = -r;
        }
        if self.pos.y < -r {
            self.pos.y = field.height + r;
        }
        true
    }

    pub fn in_bounds(&self, field: &Playfield) -> bool {
        let r = self.radius;
        (-r..=field.width + r).contains(&self.pos.x) && (-r..=field.height + r).contains(&self.pos.y)
    }
}

impl Circle for Asteroid {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generated_shape() {
        let mut rng = Pcg32::seed_from_u64(21);
        for _ in 0..50 {
            let small = Asteroid::new(Vec2::ZERO, AsteroidSize::Small, &mut rng);
            assert!((8..=12).contains(&small.vertex_count()));
            assert!((3..=5).contains(&small.crater_count()));
            assert_eq!(small.radius, 30.0);

            let large = Asteroid::new(Vec2::ZERO, AsteroidSize::Large, &mut rng);
            assert!((6..=10).contains(&large.crater_count()));
            assert_eq!(large.radius, 60.0);
            for v in large.vertices() {
                let d = v.length();
                assert!(d >= 45.0 - 1e-3 && d <= 75.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_craters_are_stable() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut rock = Asteroid::new(Vec2::new(100.0, 100.0), AsteroidSize::Small, &mut rng);
        let before: Vec<f32> = rock.craters().map(|(c, _)| c.distance(rock.pos)).collect();
        rock.rotate();
        rock.pos += Vec2::new(10.0, 10.0);
        let after: Vec<f32> = rock.craters().map(|(c, _)| c.distance(rock.pos)).collect();
        for (a, b) in before.iter().zip(&after) {
            approx::assert_abs_diff_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_wraps_sides_and_leaves_bottom() {
        let field = Playfield::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut rock = Asteroid::new(Vec2::new(-29.0, 300.0), AsteroidSize::Small, &mut rng);
        rock.vel = Vec2::new(-2.0, 0.0);
        assert!(rock.advance(&field));
        assert_eq!(rock.pos.x, 830.0);

        rock.pos = Vec2::new(400.0, 629.0);
        rock.vel = Vec2::new(0.0, 2.0);
        assert!(!rock.advance(&field));
    }

    #[test]
    fn test_rotation_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut rock = Asteroid::new(Vec2::ZERO, AsteroidSize::Small, &mut rng);
        rock.rotation = 359.5;
        rock.rotation_speed = 2.0;
        rock.rotate();
        approx::assert_abs_diff_eq!(rock.rotation, 1.5, epsilon = 1e-4);
        rock.rotation_speed = -2.0;
        rock.rotate();
        rock.rotate();
        assert!(rock.rotation >= 0.0 && rock.rotation < 360.0);
    }

    proptest! {
        #[test]
        fn prop_asteroid_stays_in_bounds(seed in any::<u64>(), x in 0.0f32..800.0, frames in 1usize..400) {
            let field = Playfield::new(800.0, 600.0);
            let mut rng = Pcg32::seed_from_u64(seed);
            let size = if seed % 5 == 0 { AsteroidSize::Large } else { AsteroidSize::Small };
            let mut rock = Asteroid::new(Vec2::new(x, -ASTEROID_BASE_RADIUS * size.multiplier()), size, &mut rng);
            prop_assert!(rock.in_bounds(&field));
            for _ in 0..frames {
                if !rock.advance(&field) {
                    break;
                }
                prop_assert!(rock.in_bounds(&field), "asteroid escaped at {:?}", rock.pos);
            }
        }
    }
}
