//! Triangle primitive.
//!
//! Hits are found on the supporting plane and then accepted with a
//! barycentric test. Edge vectors and their dot products are computed once per
//! triangle since every ray needs them.

use umbra_math::{Ray, Vec3, EPSILON};

use super::plane::{PlanarBasis, Plane};
use super::Primitive;

/// A triangle primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// Supporting plane, normal `(b − a) × (c − a)`
    plane: Plane,
    /// Cached edges `b − a`, `c − a` and their dot products
    basis: PlanarBasis,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let e0 = b - a;
        let e1 = c - a;
        Self {
            a,
            b,
            c,
            plane: Plane::new(a, e0.cross(e1)),
            basis: PlanarBasis::new(e0, e1),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// True if the vertices are collinear (zero area).
    pub fn is_degenerate(&self) -> bool {
        self.basis.is_degenerate()
    }

    /// Barycentric weights `(u, v, w)` of a point on the supporting plane,
    /// with `point = u·a + v·b + w·c`.
    pub fn barycentric(&self, point: Vec3) -> (f32, f32, f32) {
        let (v, w) = self.basis.coordinates(point - self.a);
        (1.0 - v - w, v, w)
    }

    fn within_bounds(&self, point: Vec3) -> bool {
        let (u, v, w) = self.barycentric(point);
        u >= -EPSILON && v >= -EPSILON && w >= -EPSILON
    }
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &Ray) -> f32 {
        if self.is_degenerate() {
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
        !self.is_degenerate() && self.plane.is_inside(point) && self.within_bounds(point)
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.plane.normal()
    }
}
