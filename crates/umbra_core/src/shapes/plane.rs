//! Infinite and finite planes.

use umbra_math::{Ray, Vec3, EPSILON};

use super::Primitive;

/// Two edge vectors spanning a plane, with the dot products needed to turn a
/// point back into edge coordinates cached at construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanarBasis {
    e0: Vec3,
    e1: Vec3,
    d00: f32,
    d01: f32,
    d11: f32,
    /// `1 / (d00·d11 − d01²)`, zero when the edges are parallel or empty.
    inv_denominator: f32,
}

impl PlanarBasis {
    pub(crate) fn new(e0: Vec3, e1: Vec3) -> Self {
        let d00 = e0.dot(e0);
        let d01 = e0.dot(e1);
        let d11 = e1.dot(e1);
        // d00·d11·sin²θ, so compare against the scale of the edges
        let denominator = d00 * d11 - d01 * d01;
        let inv_denominator = if denominator <= f32::EPSILON * d00 * d11 {
            0.0
        } else {
            1.0 / denominator
        };
        Self {
            e0,
            e1,
            d00,
            d01,
            d11,
            inv_denominator,
        }
    }

    #[inline]
    pub(crate) fn is_degenerate(&self) -> bool {
        self.inv_denominator == 0.0
    }

    /// Coordinates `(s, t)` such that `offset ≈ s·e0 + t·e1`.
    #[inline]
    pub(crate) fn coordinates(&self, offset: Vec3) -> (f32, f32) {
        let d20 = offset.dot(self.e0);
        let d21 = offset.dot(self.e1);
        let s = (self.d11 * d20 - self.d01 * d21) * self.inv_denominator;
        let t = (self.d00 * d21 - self.d01 * d20) * self.inv_denominator;
        (s, t)
    }

    pub(crate) fn edges(&self) -> (Vec3, Vec3) {
        (self.e0, self.e1)
    }
}

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    /// Create a plane. The normal is normalized; a zero normal gives a plane
    /// that no ray can hit.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Signed distance from the plane, positive on the normal's side.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point - self.point)
    }
}

impl Primitive for Plane {
    fn intersect(&self, ray: &Ray) -> f32 {
        let denominator = self.normal.dot(ray.direction());
        // Parallel to the plane, or a degenerate plane/ray
        if denominator.abs() < EPSILON {
            return f32::INFINITY;
        }
        let t = self.normal.dot(self.point - ray.origin()) / denominator;
        if t > EPSILON {
            t
        } else {
            f32::INFINITY
        }
    }

    /// A point is "inside" a plane when it lies on it.
    fn is_inside(&self, point: Vec3) -> bool {
        self.signed_distance(point).abs() < EPSILON
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }
}

/// A bounded piece of a plane: the parallelogram `corner + s·u + t·v` with
/// `s, t ∈ [0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FinitePlane {
    plane: Plane,
    corner: Vec3,
    basis: PlanarBasis,
}

impl FinitePlane {
    /// Create a finite plane from one corner and the two edges leaving it.
    ///
    /// The normal follows the right-hand rule, `u × v`.
    pub fn new(corner: Vec3, u: Vec3, v: Vec3) -> Self {
        Self {
            plane: Plane::new(corner, u.cross(v)),
            corner,
            basis: PlanarBasis::new(u, v),
        }
    }

    /// Square of side `size` centered at `center`, facing `normal`.
    ///
    /// A zero `normal` gives a square that no ray can hit.
    pub fn square(center: Vec3, normal: Vec3, size: f32) -> Self {
        let normal = normal.normalize_or_zero();
        if normal == Vec3::ZERO {
            return Self::new(center, Vec3::ZERO, Vec3::ZERO);
        }
        let (x, y) = normal.any_orthonormal_pair();
        // Order the edges so that x × y = normal
        let (u, v) = if x.cross(y).dot(normal) > 0.0 { (x, y) } else { (y, x) };
        let corner = center - (u + v) * (size / 2.0);
        Self::new(corner, u * size, v * size)
    }

    pub fn corner(&self) -> Vec3 {
        self.corner
    }

    /// The two edge vectors `(u, v)`.
    pub fn edges(&self) -> (Vec3, Vec3) {
        self.basis.edges()
    }

    pub fn normal(&self) -> Vec3 {
        self.plane.normal()
    }

    /// Same rectangle moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        let (u, v) = self.edges();
        Self::new(self.corner + offset, u, v)
    }

    /// Bounds check for a point already known to lie on the supporting plane.
    fn within_bounds(&self, point: Vec3) -> bool {
        let (s, t) = self.basis.coordinates(point - self.corner);
        (-EPSILON..=1.0 + EPSILON).contains(&s) && (-EPSILON..=1.0 + EPSILON).contains(&t)
    }
}

impl Primitive for FinitePlane {
    fn intersect(&self, ray: &Ray) -> f32 {
        if self.basis.is_degenerate() {
            return f32::INFINITY;
        }
        let t = self.plane.intersect(ray);
        if t.is_finite() && self.within_bounds(ray.at(t)) {
            t
        } else {
            f32::INFINITY
        }
    }

    fn is_inside(&self, point: Vec3) -> bool {
        !self.basis.is_degenerate() && self.plane.is_inside(point) && self.within_bounds(point)
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.plane.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_hit() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!((plane.intersect(&ray) - 3.0).abs() < 1e-5);

        // Seen from the back the distance is the same
        let flipped = Plane::new(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z);
        assert!((flipped.intersect(&ray) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_plane_parallel_ray_misses() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert_eq!(plane.intersect(&ray), f32::INFINITY);
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(plane.intersect(&ray), f32::INFINITY);
    }

    #[test]
    fn test_plane_ignores_origin_on_surface() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(plane.intersect(&ray), f32::INFINITY);
    }

    #[test]
    fn test_finite_plane_bounds() {
        let quad = FinitePlane::new(Vec3::new(-1.0, -1.0, 2.0), Vec3::X * 2.0, Vec3::Y * 2.0);
        assert!(quad.normal().abs_diff_eq(Vec3::Z, 1e-6));

        let inside = Ray::new(Vec3::new(0.5, 0.5, 0.0), Vec3::Z);
        assert!((quad.intersect(&inside) - 2.0).abs() < 1e-5);

        let outside = Ray::new(Vec3::new(1.5, 0.0, 0.0), Vec3::Z);
        assert_eq!(quad.intersect(&outside), f32::INFINITY);
    }

    #[test]
    fn test_finite_plane_is_inside() {
        let quad = FinitePlane::new(Vec3::ZERO, Vec3::X, Vec3::Z);
        assert!(quad.is_inside(Vec3::new(0.5, 0.0, 0.5)));
        assert!(quad.is_inside(Vec3::new(1.0, 0.0, 1.0)));
        assert!(!quad.is_inside(Vec3::new(0.5, 0.1, 0.5)));
        assert!(!quad.is_inside(Vec3::new(1.5, 0.0, 0.5)));
    }

    #[test]
    fn test_square_faces_requested_normal() {
        let square = FinitePlane::square(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y, 2.0);
        assert!(square.normal().abs_diff_eq(-Vec3::Y, 1e-5));
        let ray = Ray::new(Vec3::new(0.5, 0.0, -0.5), Vec3::Y);
        assert!((square.intersect(&ray) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_square_without_normal_is_never_hit() {
        let square = FinitePlane::square(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, 1.0);
        assert_eq!(square.normal(), Vec3::ZERO);
        assert!(square.edges().0.is_finite() && square.edges().1.is_finite());
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(square.intersect(&ray), f32::INFINITY);
        assert!(!square.is_inside(Vec3::new(0.0, 0.0, 2.0)));
    }

    #[test]
    fn test_millimetre_quad_is_hit() {
        let quad = FinitePlane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X * 0.002, Vec3::Y * 0.002);
        let ray = Ray::new(Vec3::new(0.001, 0.001, 0.0), Vec3::Z);
        assert!((quad.intersect(&ray) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_finite_plane_never_hit() {
        let sliver = FinitePlane::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        let ray = Ray::new(Vec3::new(0.5, 0.0, -1.0), Vec3::Z);
        assert_eq!(sliver.intersect(&ray), f32::INFINITY);
    }
}
