//! Pointer input mapping
//!
//! Browser pointer events arrive in viewport (client) coordinates. The game
//! wants surface-local pixels; the background wants an offset normalized to
//! the element's size.

use glam::Vec2;

use crate::sim::Player;

/// On-screen rectangle of an element, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ClientRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
}

/// Convert a client position to surface-local pixels (no clamping)
#[inline]
pub fn surface_local(client: Vec2, surface_origin: Vec2) -> Vec2 {
    client - surface_origin
}

/// Move the player to the pointer. Positions outside the surface are kept as-is.
pub fn apply_pointer(player: &mut Player, client: Vec2, rect: ClientRect) {
    player.pos = surface_local(client, rect.origin());
}

/// Pointer offset from the element center as a fraction of its size.
///
/// `(-0.5, -0.5)` is the top-left corner, `(0.5, 0.5)` the bottom-right.
/// Degenerate rects yield zero.
pub fn normalized_offset(client: Vec2, rect: ClientRect) -> Vec2 {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (client.x - rect.left) / rect.width - 0.5,
        (client.y - rect.top) / rect.height - 0.5,
    )
}
