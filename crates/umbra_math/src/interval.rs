use crate::EPSILON;

/// A range of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Valid hit distances for a ray leaving a surface: `(EPSILON, max)`.
    pub fn after_surface(max: f32) -> Self {
        Self::new(EPSILON, max)
    }

    /// True if `x` lies strictly inside `(min, max)`.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamp `x` to `[min, max]`.
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Every positive distance a ray can travel, excluding the self-hit band.
    pub const FORWARD: Interval = Interval {
        min: EPSILON,
        max: f32::INFINITY,
    };

    /// The unit range used for color channels and barycentric coordinates.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
