//! Platform abstraction layer
//!
//! Browser wiring for the game and the background:
//! - Event listener subscriptions released on dispose
//! - `requestAnimationFrame` frame scheduling
//! - Exported `MiniGame` / `ParticleBackground` handles

#[cfg(target_arch = "wasm32")]
pub mod web;
