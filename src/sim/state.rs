//! Game state and entity types
//!
//! Everything the mini-game needs between frames lives in [`GameState`].
//! Entity collections are filled once at construction and never resized.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Pixel size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's ship marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
}

impl Player {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            pos: Vec2::new(bounds.width / 2.0, bounds.height * PLAYER_START_Y_FRACTION),
            radius: PLAYER_RADIUS,
        }
    }
}

/// A collectible light orb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub pos: Vec2,
    pub radius: f32,
    /// Fall speed in pixels per baseline frame
    pub speed: f32,
}

/// A void ring to avoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub radius: f32,
    /// Fall speed in pixels per baseline frame
    pub speed: f32,
}

/// Shared access for entities that fall down the surface and get recycled
pub trait Falling {
    fn pos(&self) -> Vec2;
    fn pos_mut(&mut self) -> &mut Vec2;
    fn radius(&self) -> f32;
    fn speed(&self) -> f32;

    /// Entirely below the bottom edge
    fn has_exited(&self, bounds: Bounds) -> bool {
        self.pos().y - self.radius() > bounds.height
    }
}

macro_rules! impl_falling {
    ($ty:ty) => {
        impl Falling for $ty {
            #[inline]
            fn pos(&self) -> Vec2 {
                self.pos
            }
            #[inline]
            fn pos_mut(&mut self) -> &mut Vec2 {
                &mut self.pos
            }
            #[inline]
            fn radius(&self) -> f32 {
                self.radius
            }
            #[inline]
            fn speed(&self) -> f32 {
                self.speed
            }
        }
    };
}

impl_falling!(Orb);
impl_falling!(Hazard);

/// Complete mini-game state for one mount
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Drawing surface size
    pub bounds: Bounds,
    pub player: Player,
    /// Always `ORB_COUNT` long
    pub orbs: Vec<Orb>,
    /// Always `HAZARD_COUNT` long
    pub hazards: Vec<Hazard>,
    pub score: u64,
    /// Frames stepped since mount
    pub frames: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh state for a surface of the given size
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let orbs = (0..ORB_COUNT)
            .map(|_| Orb {
                pos: initial_position(&mut rng, bounds),
                radius: random_in(&mut rng, ORB_RADIUS_MIN, ORB_RADIUS_MAX),
                speed: random_in(&mut rng, ORB_SPEED_MIN, ORB_SPEED_MAX),
            })
            .collect();

        let hazards = (0..HAZARD_COUNT)
            .map(|_| Hazard {
                pos: initial_position(&mut rng, bounds),
                radius: random_in(&mut rng, HAZARD_RADIUS_MIN, HAZARD_RADIUS_MAX),
                speed: random_in(&mut rng, HAZARD_SPEED_MIN, HAZARD_SPEED_MAX),
            })
            .collect();

        Self {
            seed,
            bounds,
            player: Player::new(bounds),
            orbs,
            hazards,
            score: 0,
            frames: 0,
            rng,
        }
    }

    /// Update the surface size. Entities keep their positions.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Position a recycled entity just above the top edge at a random column
    pub fn respawn_position(&mut self) -> Vec2 {
        respawn_position(&mut self.rng, self.bounds)
    }
}

/// Random column in `[0, width)` just above the top edge
pub(crate) fn respawn_position(rng: &mut Pcg32, bounds: Bounds) -> Vec2 {
    Vec2::new(random_in(rng, 0.0, bounds.width), RESPAWN_Y)
}

/// Uniform sample in `[min, max)`, or `min` when the range is empty
fn random_in(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Spread entities over one surface height above the top edge
fn initial_position(rng: &mut Pcg32, bounds: Bounds) -> Vec2 {
    let x = random_in(rng, 0.0, bounds.width);
    let y = if bounds.height > 0.0 {
        random_in(rng, -bounds.height, 0.0)
    } else {
        RESPAWN_Y
    };
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_cardinality() {
        let state = GameState::new(1, Bounds::new(640.0, 400.0));
        assert_eq!(state.orbs.len(), ORB_COUNT);
        assert_eq!(state.hazards.len(), HAZARD_COUNT);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_player_starts_low_center() {
        let state = GameState::new(1, Bounds::new(640.0, 400.0));
        assert_eq!(state.player.pos, Vec2::new(320.0, 320.0));
        assert_eq!(state.player.radius, PLAYER_RADIUS);
    }

    #[test]
    fn test_entities_start_above_surface() {
        let bounds = Bounds::new(640.0, 400.0);
        let state = GameState::new(7, bounds);
        for orb in &state.orbs {
            assert!(orb.pos.x >= 0.0 && orb.pos.x < bounds.width);
            assert!(orb.pos.y >= -bounds.height && orb.pos.y < 0.0);
            assert!(orb.radius >= ORB_RADIUS_MIN && orb.radius < ORB_RADIUS_MAX);
            assert!(orb.speed >= ORB_SPEED_MIN && orb.speed < ORB_SPEED_MAX);
        }
        for hazard in &state.hazards {
            assert!(hazard.pos.y < 0.0);
            assert!(hazard.radius >= HAZARD_RADIUS_MIN && hazard.radius < HAZARD_RADIUS_MAX);
            assert!(hazard.speed >= HAZARD_SPEED_MIN && hazard.speed < HAZARD_SPEED_MAX);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let bounds = Bounds::new(800.0, 500.0);
        let a = GameState::new(4242, bounds);
        let b = GameState::new(4242, bounds);
        assert_eq!(a.seed, 4242);
        assert_eq!(a.orbs, b.orbs);
        assert_eq!(a.hazards, b.hazards);
    }

    #[test]
    fn test_zero_size_surface_does_not_panic() {
        let mut state = GameState::new(3, Bounds::new(0.0, 0.0));
        assert_eq!(state.orbs.len(), ORB_COUNT);
        let pos = state.respawn_position();
        assert_eq!(pos, Vec2::new(0.0, RESPAWN_Y));
    }

    #[test]
    fn test_has_exited() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut orb = Orb {
            pos: Vec2::new(50.0, 104.0),
            radius: 5.0,
            speed: 1.0,
        };
        // Still overlapping the bottom edge
        assert!(!orb.has_exited(bounds));
        orb.pos.y = 105.5;
        assert!(orb.has_exited(bounds));
    }
}
