//! Decorative particle background
//!
//! Independent of the mini-game: a point cloud that slowly spins, a light
//! that orbits it and a camera that drifts toward the pointer.

pub mod field;
pub mod scene;

pub use field::{ParticleField, hex_to_linear};
pub use scene::{BackgroundScene, SceneParams, light_position};
