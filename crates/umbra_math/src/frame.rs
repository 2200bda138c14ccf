// Local shading frames
//
// Sampling routines produce directions around +Z. A Frame rotates them onto a
// surface so that +Z follows the given axis (usually the visible normal).

use glam::{Mat3, Vec3};

/// Orthonormal basis with `axis` as the local Z direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    basis: Mat3,
}

impl Frame {
    /// Build a frame around a (not necessarily normalized) axis.
    pub fn from_axis(axis: Vec3) -> Self {
        let z = axis.normalize();
        let (x, y) = z.any_orthonormal_pair();
        Self {
            basis: Mat3::from_cols(x, y, z),
        }
    }

    /// Local Z axis in world space.
    #[inline]
    pub fn axis(&self) -> Vec3 {
        self.basis.z_axis
    }

    /// Transform a local direction to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.basis * local
    }

    /// Direction from spherical angles measured against the local Z axis.
    pub fn spherical_direction(&self, inclination: f32, azimuth: f32) -> Vec3 {
        let (sin_i, cos_i) = inclination.sin_cos();
        let (sin_a, cos_a) = azimuth.sin_cos();
        self.to_world(Vec3::new(sin_i * cos_a, sin_i * sin_a, cos_i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_z_maps_to_axis() {
        let axis = Vec3::new(1.0, 2.0, -0.5).normalize();
        let frame = Frame::from_axis(axis);
        assert!(frame.to_world(Vec3::Z).abs_diff_eq(axis, 1e-5));
        assert!(frame.axis().abs_diff_eq(axis, 1e-5));
    }

    #[test]
    fn test_frame_is_orthonormal() {
        let frame = Frame::from_axis(Vec3::new(0.0, -1.0, 0.0));
        let x = frame.to_world(Vec3::X);
        let y = frame.to_world(Vec3::Y);
        assert!((x.length() - 1.0).abs() < 1e-5);
        assert!((y.length() - 1.0).abs() < 1e-5);
        assert!(x.dot(y).abs() < 1e-5);
        assert!(x.dot(frame.axis()).abs() < 1e-5);
    }

    #[test]
    fn test_to_world_preserves_length() {
        let frame = Frame::from_axis(Vec3::new(0.3, 0.3, 0.9));
        let v = Vec3::new(0.2, -0.7, 0.4);
        assert!((frame.to_world(v).length() - v.length()).abs() < 1e-5);
    }

    #[test]
    fn test_zero_inclination_is_axis() {
        let frame = Frame::from_axis(Vec3::X);
        assert!(frame.spherical_direction(0.0, 1.3).abs_diff_eq(Vec3::X, 1e-5));
    }
}
