//! Per-frame simulation step
//!
//! Advances falling entities, recycles the ones that leave the surface and
//! resolves collisions against the player.

use rand_pcg::Pcg32;

use super::circles_overlap;
use super::state::{Bounds, Falling, GameState, Player, respawn_position};
use crate::consts::*;

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Orbs touched by the player this frame
    pub collected: u32,
    /// Hazards touched by the player this frame
    pub hits: u32,
}

impl StepReport {
    pub fn is_quiet(&self) -> bool {
        self.collected == 0 && self.hits == 0
    }
}

/// Normalize a frame delta (milliseconds) to baseline frames.
///
/// Negative deltas count as zero and stalls are capped at `MAX_FRAME_MS`.
pub fn frame_dt(delta_ms: f64) -> f32 {
    (delta_ms.clamp(0.0, MAX_FRAME_MS) / BASELINE_FRAME_MS) as f32
}

/// Advance the game state by one frame scaled by `dt`
pub fn step(state: &mut GameState, dt: f32) -> StepReport {
    let GameState {
        bounds,
        player,
        orbs,
        hazards,
        score,
        frames,
        rng,
        ..
    } = state;

    let collected = fall_and_collide(orbs, *player, *bounds, rng, ORB_FALL_SCALE * dt);
    *score += u64::from(collected) * ORB_REWARD;

    let hits = fall_and_collide(hazards, *player, *bounds, rng, HAZARD_FALL_SCALE * dt);
    *score = score.saturating_sub(u64::from(hits) * HAZARD_PENALTY);

    *frames += 1;

    let report = StepReport { collected, hits };
    if !report.is_quiet() {
        log::debug!(
            "frame {}: collected {}, hit {}, score {}",
            frames,
            collected,
            hits,
            score
        );
    }
    report
}

/// Move each entity, recycle exits, then test the moved entity against the
/// player. Returns the number of collisions.
fn fall_and_collide<E: Falling>(
    entities: &mut [E],
    player: Player,
    bounds: Bounds,
    rng: &mut Pcg32,
    distance: f32,
) -> u32 {
    let mut collisions = 0;
    for entity in entities.iter_mut() {
        let fall = entity.speed() * distance;
        entity.pos_mut().y += fall;

        if entity.has_exited(bounds) {
            *entity.pos_mut() = respawn_position(rng, bounds);
        }

        if circles_overlap(entity.pos(), entity.radius(), player.pos, player.radius) {
            collisions += 1;
            *entity.pos_mut() = respawn_position(rng, bounds);
        }
    }
    collisions
}
