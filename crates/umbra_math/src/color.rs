// Color utilities
//
// Colors are plain Vec3 triples. Channels are unclamped linear radiance and may
// exceed 1.0; only the image writer maps them to the display range.

use glam::Vec3;

/// Color type alias (linear RGB, unclamped)
pub type Color = Vec3;

pub const BLACK: Color = Vec3::ZERO;
pub const WHITE: Color = Vec3::ONE;
pub const GRAY: Color = Vec3::splat(0.5);

/// Extension trait for Vec3 used as a color
pub trait ColorExt {
    /// Mean of the three channels.
    fn mean_rgb(&self) -> f32;

    /// Restrict every channel to [0, 1].
    fn clamp01(&self) -> Color;

    /// Power-law correction, `channel^(1/gamma)`. Negative channels map to 0.
    fn gamma_correct(&self, gamma: f32) -> Color;

    /// True if every channel is exactly zero.
    fn is_black(&self) -> bool;
}

impl ColorExt for Color {
    #[inline]
    fn mean_rgb(&self) -> f32 {
        (self.x + self.y + self.z) / 3.0
    }

    #[inline]
    fn clamp01(&self) -> Color {
        self.clamp(Vec3::ZERO, Vec3::ONE)
    }

    fn gamma_correct(&self, gamma: f32) -> Color {
        let inv = 1.0 / gamma;
        Vec3::new(
            self.x.max(0.0).powf(inv),
            self.y.max(0.0).powf(inv),
            self.z.max(0.0).powf(inv),
        )
    }

    #[inline]
    fn is_black(&self) -> bool {
        *self == BLACK
    }
}
