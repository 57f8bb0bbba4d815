//! Mini-game simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Entities live in plain vectors of fixed length and are recycled in place
//! - Seeded RNG only
//! - Stable iteration order (orbs, then hazards, by index)

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::circles_overlap;
pub use state::{Bounds, GameState, Hazard, Orb, Player};
pub use tick::{StepReport, frame_dt, step};
