//! Boxes built from six finite planes.

use umbra_math::{Mat3, Ray, Vec3, EPSILON};

use super::{nearest_of, FinitePlane, Primitive};

/// A box (parallelepiped) extruded from a base rectangle.
///
/// The box has no surface of its own: rays hit one of its six faces, and
/// shading always uses that face.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    faces: [FinitePlane; 6],
    corner: Vec3,
    /// World offset to (u, v, depth) coordinates; `None` for flat boxes
    to_local: Option<Mat3>,
}

impl Cuboid {
    /// Extrude `base` by `depth` along its normal.
    ///
    /// Every face normal points out of the box, whatever the sign of `depth`.
    pub fn new(base: FinitePlane, depth: f32) -> Self {
        let corner = base.corner();
        let (u, v) = base.edges();
        let w = base.normal() * depth;
        let center = corner + (u + v + w) * 0.5;

        let faces = [
            // Base and top
            outward_face(corner, u, v, center),
            outward_face(corner + w, u, v, center),
            // Sides along u
            outward_face(corner, u, w, center),
            outward_face(corner + v, u, w, center),
            // Sides along v
            outward_face(corner, v, w, center),
            outward_face(corner + u, v, w, center),
        ];

        let edges = Mat3::from_cols(u, v, w);
        let volume_scale = u.length() * v.length() * w.length();
        let to_local = if edges.determinant().abs() > f32::EPSILON * volume_scale {
            Some(edges.inverse())
        } else {
            None
        };

        Self {
            faces,
            corner,
            to_local,
        }
    }

    /// Axis-aligned box spanning two opposite corners.
    pub fn axis_aligned(min: Vec3, max: Vec3) -> Self {
        let lo = min.min(max);
        let size = max.max(min) - lo;
        let base = FinitePlane::new(lo, Vec3::X * size.x, Vec3::Y * size.y);
        // Base normal is +Z, so extruding by the z extent covers the box
        Self::new(base, size.z)
    }

    pub fn faces(&self) -> &[FinitePlane; 6] {
        &self.faces
    }

    /// The face nearest along `ray` and its distance.
    pub fn nearest_face(&self, ray: &Ray) -> Option<(&FinitePlane, f32)> {
        nearest_of(&self.faces, ray)
    }

    /// True if `point` lies inside the box or on its boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        match self.to_local {
            Some(to_local) => {
                let local = to_local * (point - self.corner);
                local.cmpge(Vec3::splat(-EPSILON)).all()
                    && local.cmple(Vec3::splat(1.0 + EPSILON)).all()
            }
            None => self.faces.iter().any(|face| face.is_inside(point)),
        }
    }
}

/// Face spanned by `a` and `b` from `corner`, wound so its normal points
/// away from `center`.
fn outward_face(corner: Vec3, a: Vec3, b: Vec3, center: Vec3) -> FinitePlane {
    let face_center = corner + (a + b) * 0.5;
    if a.cross(b).dot(face_center - center) < 0.0 {
        FinitePlane::new(corner, b, a)
    } else {
        FinitePlane::new(corner, a, b)
    }
}
