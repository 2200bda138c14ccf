// Re-export glam for convenience
pub use glam::*;

// Umbra math types
mod color;
mod frame;
mod interval;
mod ray;

pub use color::{Color, ColorExt, BLACK, GRAY, WHITE};
pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;

/// Tolerance for near-parallel rays and self-intersection rejection.
pub const EPSILON: f32 = 1e-4;
