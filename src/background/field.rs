//! Static point cloud for the background

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Size of the box the points are scattered in (centered at the origin)
pub const FIELD_EXTENT: Vec3 = Vec3::new(24.0, 14.0, 18.0);

/// Gradient endpoints (sRGB hex)
pub const COLOR_A: u32 = 0x22c55e;
pub const COLOR_B: u32 = 0x34d399;

/// sRGB channel to linear
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` to linear RGB
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Point positions and linear colors, generated once per mount
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl ParticleField {
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let a = hex_to_linear(COLOR_A);
        let b = hex_to_linear(COLOR_B);

        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let unit = Vec3::new(
                rng.random::<f32>() - 0.5,
                rng.random::<f32>() - 0.5,
                rng.random::<f32>() - 0.5,
            );
            positions.push(unit * FIELD_EXTENT);
            colors.push(a.lerp(b, rng.random::<f32>()));
        }

        Self { positions, colors }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
