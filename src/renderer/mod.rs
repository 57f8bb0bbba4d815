//! Rendering
//!
//! - `canvas`: Canvas 2D painter for the mini-game
//! - `particles`: WebGPU instanced point cloud for the background

pub mod canvas;
pub mod particles;
pub mod vertex;

pub use canvas::{DrawSurface, render_frame};
pub use particles::ParticleRenderState;
