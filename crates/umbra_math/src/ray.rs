use crate::Vec3;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// Points along the ray are `origin + t * direction` for `t >= 0`. Rays are
/// immutable once built; bounce directions always produce a new ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized here.
    ///
    /// A zero-length direction stays zero, and such a ray hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray starting at `from` and pointing at `to`.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Returns true if the direction collapsed to zero during construction.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
