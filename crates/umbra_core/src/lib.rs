//! Umbra Core - scene description for the Umbra path tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: spheres, planes, finite planes, triangles, boxes and
//!   triangle meshes, each answering ray intersection and normal queries
//! - **Materials**: diffuse/specular/reflective/refractive weights with an
//!   enforced energy budget
//! - **Lights**: point lights and area lights built from point-light grids
//! - **Camera**: pinhole projection from pixels to primary rays
//! - **Scene**: the container the renderer consumes read-only
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::{Camera, PointLight, Scene, Sphere};
//! use umbra_math::{Vec3, WHITE};
//!
//! let mut scene = Scene::new();
//! scene.add_shape(Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0));
//! scene.add_light_source(PointLight::new(Vec3::new(1.0, 2.0, 0.0), 10.0, WHITE));
//! scene.set_camera(Camera::default().with_resolution(320, 240));
//! ```

pub mod camera;
pub mod light;
pub mod material;
pub mod scene;
pub mod shapes;

// Re-export commonly used types
pub use camera::Camera;
pub use light::{AreaLight, LightSource, PointLight};
pub use material::{refractive_index, DiffusePattern, Interaction, Material, MaterialError};
pub use scene::{Scene, SceneError};
pub use shapes::{
    Cuboid, FinitePlane, Geometry, Mesh, MeshError, Plane, Primitive, Shape, ShapeError, Sphere,
    Triangle,
};
