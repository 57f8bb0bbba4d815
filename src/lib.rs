//! HyperTunnel - neon mini-game and particle background
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, collisions, score)
//! - `driver`: Pausable animation loop with cancellable frame scheduling
//! - `input`: Pointer to surface coordinate mapping
//! - `renderer`: Canvas 2D frame painter and WebGPU particle pipeline
//! - `background`: Decorative point cloud animation (camera parallax, light orbit)
//! - `platform`: Browser glue (wasm32 only)

pub mod background;
pub mod driver;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{AnimationDriver, FrameClock, FrameScheduler, LoopState};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Frame duration the motion speeds are tuned for (60 fps)
    pub const BASELINE_FRAME_MS: f64 = 16.6667;
    /// Longest frame delta applied in one step; longer stalls are capped
    pub const MAX_FRAME_MS: f64 = 32.0;

    /// Player marker radius
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Player starts centered horizontally, 80% down the surface
    pub const PLAYER_START_Y_FRACTION: f32 = 0.8;

    /// Collectible orbs
    pub const ORB_COUNT: usize = 36;
    pub const ORB_RADIUS_MIN: f32 = 3.0;
    pub const ORB_RADIUS_MAX: f32 = 5.0;
    pub const ORB_SPEED_MIN: f32 = 1.2;
    pub const ORB_SPEED_MAX: f32 = 2.4;
    /// Fall speed multiplier applied on top of each orb's own speed
    pub const ORB_FALL_SCALE: f32 = 1.2;
    pub const ORB_REWARD: u64 = 1;

    /// Hazard rings
    pub const HAZARD_COUNT: usize = 16;
    pub const HAZARD_RADIUS_MIN: f32 = 8.0;
    pub const HAZARD_RADIUS_MAX: f32 = 14.0;
    pub const HAZARD_SPEED_MIN: f32 = 1.4;
    pub const HAZARD_SPEED_MAX: f32 = 2.2;
    pub const HAZARD_FALL_SCALE: f32 = 1.1;
    pub const HAZARD_PENALTY: u64 = 2;

    /// Recycled entities re-enter just above the top edge
    pub const RESPAWN_Y: f32 = -10.0;
}
