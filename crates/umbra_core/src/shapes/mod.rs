//! Geometric primitives and the shapes placed in a scene.
//!
//! Leaf primitives (sphere, plane, finite plane, triangle) implement
//! [`Primitive`]. Boxes and meshes are composites: they answer intersection
//! queries by folding over their faces, and shading always goes through the
//! face that was actually hit.

mod cuboid;
mod mesh;
mod plane;
mod sphere;
mod triangle;

use std::sync::Arc;

use thiserror::Error;
use umbra_math::{Color, Ray, Vec3};

use crate::material::{refractive_index, Material};

pub use cuboid::Cuboid;
pub use mesh::{Mesh, MeshError};
pub use plane::{FinitePlane, Plane};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Errors raised by shape queries that have no meaningful answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("{kind} is a composite shape; query the face that was hit")]
    CompositeNormal { kind: &'static str },
}

/// Capabilities of a leaf primitive.
pub trait Primitive: Send + Sync {
    /// Distance along `ray` to the nearest hit beyond `EPSILON`, or
    /// `f32::INFINITY` when there is none.
    fn intersect(&self, ray: &Ray) -> f32;

    /// True if `point` lies inside (or on) the primitive.
    fn is_inside(&self, point: Vec3) -> bool;

    /// Geometric unit normal at a point on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Normal flipped to face against `direction`, the incoming ray.
    fn visible_normal(&self, point: Vec3, direction: Vec3) -> Vec3 {
        let normal = self.normal(point);
        if normal.dot(direction) > 0.0 {
            -normal
        } else {
            normal
        }
    }
}

/// Nearest primitive of a slice along `ray`, folded by minimum distance.
pub(crate) fn nearest_of<'a, P: Primitive>(faces: &'a [P], ray: &Ray) -> Option<(&'a P, f32)> {
    faces
        .iter()
        .map(|face| (face, face.intersect(ray)))
        .filter(|(_, t)| t.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Every kind of geometry a shape can have.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Plane(Plane),
    FinitePlane(FinitePlane),
    Triangle(Triangle),
    Cuboid(Cuboid),
    Mesh(Mesh),
}

impl Geometry {
    /// Distance to the nearest hit, `f32::INFINITY` on a miss.
    pub fn intersect(&self, ray: &Ray) -> f32 {
        self.nearest_face(ray).map_or(f32::INFINITY, |(_, t)| t)
    }

    /// The leaf primitive hit first along `ray` and its distance.
    ///
    /// For leaves this is the geometry itself; boxes and meshes report the
    /// face or triangle that was hit.
    pub fn nearest_face(&self, ray: &Ray) -> Option<(&dyn Primitive, f32)> {
        fn leaf<'a, P: Primitive>(primitive: &'a P, ray: &Ray) -> Option<(&'a dyn Primitive, f32)> {
            let t = primitive.intersect(ray);
            t.is_finite().then_some((primitive as &dyn Primitive, t))
        }

        match self {
            Geometry::Sphere(s) => leaf(s, ray),
            Geometry::Plane(p) => leaf(p, ray),
            Geometry::FinitePlane(p) => leaf(p, ray),
            Geometry::Triangle(t) => leaf(t, ray),
            Geometry::Cuboid(c) => c
                .nearest_face(ray)
                .map(|(face, t)| (face as &dyn Primitive, t)),
            Geometry::Mesh(m) => m
                .nearest_face(ray)
                .map(|(tri, t)| (tri as &dyn Primitive, t)),
        }
    }

    pub fn is_inside(&self, point: Vec3) -> bool {
        match self {
            Geometry::Sphere(s) => s.is_inside(point),
            Geometry::Plane(p) => p.is_inside(point),
            Geometry::FinitePlane(p) => p.is_inside(point),
            Geometry::Triangle(t) => t.is_inside(point),
            Geometry::Cuboid(c) => c.contains(point),
            Geometry::Mesh(m) => m.contains(point),
        }
    }

    /// Geometric normal of a leaf. Composites have no single normal.
    pub fn normal(&self, point: Vec3) -> Result<Vec3, ShapeError> {
        match self {
            Geometry::Sphere(s) => Ok(s.normal(point)),
            Geometry::Plane(p) => Ok(Primitive::normal(p, point)),
            Geometry::FinitePlane(p) => Ok(Primitive::normal(p, point)),
            Geometry::Triangle(t) => Ok(t.normal(point)),
            Geometry::Cuboid(_) | Geometry::Mesh(_) => {
                Err(ShapeError::CompositeNormal { kind: self.kind() })
            }
        }
    }

    /// Short human-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere(_) => "sphere",
            Geometry::Plane(_) => "plane",
            Geometry::FinitePlane(_) => "finite plane",
            Geometry::Triangle(_) => "triangle",
            Geometry::Cuboid(_) => "box",
            Geometry::Mesh(_) => "mesh",
        }
    }
}

/// A piece of geometry with everything needed to shade it.
#[derive(Debug, Clone)]
pub struct Shape {
    geometry: Geometry,
    material: Arc<Material>,
    refractive_index: f32,
    /// Radiance emitted toward every direction, already scaled by power
    emission: Option<Color>,
}

impl Shape {
    /// Create a shape with the default material in air.
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self {
            geometry: geometry.into(),
            material: Arc::new(Material::default()),
            refractive_index: refractive_index::AIR,
            emission: None,
        }
    }

    pub fn with_material(self, material: Material) -> Self {
        self.with_shared_material(Arc::new(material))
    }

    /// Use a material shared with other shapes.
    pub fn with_shared_material(mut self, material: Arc<Material>) -> Self {
        self.material = material;
        self
    }

    pub fn with_refractive_index(mut self, index: f32) -> Self {
        self.refractive_index = index;
        self
    }

    /// Turn the shape into an emitter of `color × power`. Emitters do not
    /// reflect light, so the material is replaced by [`Material::none`].
    pub fn with_emission(mut self, color: Color, power: f32) -> Self {
        self.emission = Some(color * power);
        self.material = Arc::new(Material::none());
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    pub fn emission(&self) -> Option<Color> {
        self.emission
    }

    pub fn intersect(&self, ray: &Ray) -> f32 {
        self.geometry.intersect(ray)
    }

    pub fn nearest_face(&self, ray: &Ray) -> Option<(&dyn Primitive, f32)> {
        self.geometry.nearest_face(ray)
    }

    pub fn is_inside(&self, point: Vec3) -> bool {
        self.geometry.is_inside(point)
    }

    pub fn normal(&self, point: Vec3) -> Result<Vec3, ShapeError> {
        self.geometry.normal(point)
    }
}

impl From<Geometry> for Shape {
    fn from(geometry: Geometry) -> Self {
        Shape::new(geometry)
    }
}

macro_rules! impl_geometry_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Geometry::$variant(value)
                }
            }

            impl From<$variant> for Shape {
                fn from(value: $variant) -> Self {
                    Shape::new(value)
                }
            }
        )*
    };
}

impl_geometry_from!(Sphere, Plane, FinitePlane, Triangle, Cuboid, Mesh);

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_math::WHITE;

    #[test]
    fn test_composite_normal_is_an_error() {
        let cube = Geometry::from(Cuboid::axis_aligned(Vec3::ZERO, Vec3::ONE));
        assert_eq!(
            cube.normal(Vec3::new(0.5, 0.5, 0.0)),
            Err(ShapeError::CompositeNormal { kind: "box" })
        );

        let mesh = Geometry::from(Mesh::icosahedron(Vec3::ZERO, 1.0));
        assert!(mesh.normal(Vec3::Z).is_err());
    }

    #[test]
    fn test_composite_reports_hit_face() {
        let cube = Geometry::from(Cuboid::axis_aligned(
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(1.0, 1.0, 4.0),
        ));
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let (face, t) = cube.nearest_face(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
        let hit = ray.at(t);
        assert!(face.visible_normal(hit, ray.direction()).abs_diff_eq(-Vec3::Z, 1e-6));
        assert!((cube.intersect(&ray) - t).abs() < 1e-6);
    }

    #[test]
    fn test_visible_normal_faces_ray() {
        let plane = Plane::new(Vec3::ZERO, Vec3::Y);
        let from_above = plane.visible_normal(Vec3::ZERO, -Vec3::Y);
        let from_below = plane.visible_normal(Vec3::ZERO, Vec3::Y);
        assert_eq!(from_above, Vec3::Y);
        assert_eq!(from_below, -Vec3::Y);

        // From inside a sphere the normal points inward
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let n = sphere.visible_normal(Vec3::Z, Vec3::Z);
        assert!(n.abs_diff_eq(-Vec3::Z, 1e-6));
    }

    #[test]
    fn test_shape_defaults_and_emission() {
        let shape = Shape::new(Sphere::new(Vec3::ZERO, 1.0));
        assert_eq!(shape.refractive_index(), refractive_index::AIR);
        assert_eq!(shape.emission(), None);
        assert_eq!(shape.material(), &Material::default());

        let lamp = Shape::from(Sphere::new(Vec3::ZERO, 1.0)).with_emission(WHITE, 4.0);
        assert_eq!(lamp.emission(), Some(Vec3::splat(4.0)));
        assert_eq!(lamp.material(), &Material::none());
    }

    #[test]
    fn test_shared_material() {
        let material = Arc::new(Material::mirror());
        let a = Shape::new(Sphere::new(Vec3::ZERO, 1.0)).with_shared_material(material.clone());
        let b = Shape::new(Sphere::new(Vec3::X, 1.0)).with_shared_material(material.clone());
        assert_eq!(Arc::strong_count(&material), 3);
        assert_eq!(a.material(), b.material());
    }

    #[test]
    fn test_miss_is_infinite() {
        let shape = Shape::new(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y));
        let ray = Ray::new(Vec3::new(5.0, 5.0, -1.0), Vec3::Z);
        assert_eq!(shape.intersect(&ray), f32::INFINITY);
        assert!(shape.nearest_face(&ray).is_none());
    }
}
