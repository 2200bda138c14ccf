//! Ray queries against the whole shape list.
//!
//! There is no acceleration structure: every query scans all shapes.

use umbra_core::{Primitive, Scene, Shape};
use umbra_math::{Interval, Ray, Vec3};

/// Nearest intersection of a ray with the scene.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Shape carrying material, emission and refractive index
    pub shape: &'a Shape,
    /// Leaf primitive actually hit (a box face or mesh triangle for composites)
    pub face: &'a dyn Primitive,
    /// Distance along the ray
    pub t: f32,
}

impl<'a> Hit<'a> {
    /// World-space hit point for the ray that produced this hit.
    #[inline]
    pub fn point(&self, ray: &Ray) -> Vec3 {
        ray.at(self.t)
    }
}

impl std::fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hit")
            .field("shape", &self.shape.geometry().kind())
            .field("t", &self.t)
            .finish()
    }
}

/// The shape hit first along `ray`, if any.
pub fn nearest<'a>(shapes: &'a [Shape], ray: &Ray) -> Option<Hit<'a>> {
    shapes
        .iter()
        .filter_map(|shape| {
            shape
                .nearest_face(ray)
                .map(|(face, t)| Hit { shape, face, t })
        })
        .filter(|hit| Interval::FORWARD.surrounds(hit.t))
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

/// True if any shape blocks `ray` strictly between the surface and
/// `max_distance`. A hit exactly at `max_distance` does not count.
pub fn occluded(shapes: &[Shape], ray: &Ray, max_distance: f32) -> bool {
    let range = Interval::after_surface(max_distance);
    shapes.iter().any(|shape| range.surrounds(shape.intersect(ray)))
}

/// Scene-level ray queries.
pub trait SceneQuery {
    fn nearest(&self, ray: &Ray) -> Option<Hit<'_>>;
    fn occluded(&self, ray: &Ray, max_distance: f32) -> bool;
}

impl SceneQuery for Scene {
    fn nearest(&self, ray: &Ray) -> Option<Hit<'_>> {
        nearest(self.shapes(), ray)
    }

    fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        occluded(self.shapes(), ray, max_distance)
    }
}
