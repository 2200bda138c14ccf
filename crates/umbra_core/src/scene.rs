//! The scene container handed to the renderer.
//!
//! A scene is built once through the mutating API below and then borrowed
//! read-only for the whole render.

use thiserror::Error;

use crate::camera::Camera;
use crate::light::LightSource;
use crate::shapes::Shape;

/// Render parameters a scene can be rejected for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("indirect lighting is enabled with {steps} steps but no indirect rays")]
    NoIndirectRays { steps: u32 },
}

/// Shapes, lights, camera and indirect-lighting parameters.
#[derive(Debug, Clone)]
pub struct Scene {
    shapes: Vec<Shape>,
    lights: Vec<LightSource>,
    camera: Camera,

    /// Bounce depth for indirect lighting; 0 disables it
    indirect_steps: u32,
    /// Rays sampled at each primary hit for indirect lighting
    indirect_rays: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene with the default camera and direct lighting only.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            lights: Vec::new(),
            camera: Camera::default(),
            indirect_steps: 0,
            indirect_rays: 1,
        }
    }

    pub fn add_shape(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn add_light_source(&mut self, light: impl Into<LightSource>) {
        self.lights.push(light.into());
    }

    /// Replace the camera. The new camera's resolution becomes the image
    /// dimensions.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn set_image_dimensions(&mut self, width: u32, height: u32) {
        self.camera.set_resolution(width, height);
    }

    pub fn set_indirect_steps(&mut self, steps: u32) {
        self.indirect_steps = steps;
    }

    pub fn set_indirect_rays(&mut self, rays: u32) {
        self.indirect_rays = rays;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn width(&self) -> u32 {
        self.camera.width()
    }

    pub fn height(&self) -> u32 {
        self.camera.height()
    }

    pub fn indirect_steps(&self) -> u32 {
        self.indirect_steps
    }

    pub fn indirect_rays(&self) -> u32 {
        self.indirect_rays
    }

    /// True if indirect bounces will be traced.
    pub fn has_indirect_lighting(&self) -> bool {
        self.indirect_steps > 0 && self.indirect_rays > 0
    }

    /// Check the render parameters.
    pub fn validate(&self) -> Result<(), SceneError> {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return Err(SceneError::ZeroDimensions { width, height });
        }
        if self.indirect_steps > 0 && self.indirect_rays == 0 {
            return Err(SceneError::NoIndirectRays {
                steps: self.indirect_steps,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PointLight, Sphere};
    use umbra_math::{Vec3, WHITE};

    #[test]
    fn test_new_scene_is_empty() {
        let scene = Scene::new();
        assert!(scene.shapes().is_empty());
        assert!(scene.lights().is_empty());
        assert_eq!(scene.indirect_steps(), 0);
        assert!(!scene.has_indirect_lighting());
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_indirect_needs_steps_and_rays() {
        let mut scene = Scene::new();
        scene.set_indirect_steps(3);
        scene.set_indirect_rays(0);
        assert!(!scene.has_indirect_lighting());
        scene.set_indirect_rays(4);
        assert!(scene.has_indirect_lighting());
    }

    #[test]
    fn test_builders() {
        let mut scene = Scene::new();
        scene.add_shape(Sphere::new(Vec3::Z * 3.0, 1.0));
        scene.add_light_source(PointLight::new(Vec3::Y, 1.0, WHITE));
        scene.set_camera(Camera::default().with_resolution(64, 32));
        assert_eq!((scene.width(), scene.height()), (64, 32));

        scene.set_image_dimensions(10, 20);
        assert_eq!((scene.width(), scene.height()), (10, 20));
        assert_eq!(scene.shapes().len(), 1);
        assert_eq!(scene.lights().len(), 1);

        scene.set_indirect_steps(2);
        scene.set_indirect_rays(16);
        assert!(scene.has_indirect_lighting());
    }

    #[test]
    fn test_validate() {
        let mut scene = Scene::new();
        scene.set_image_dimensions(0, 10);
        assert_eq!(
            scene.validate(),
            Err(SceneError::ZeroDimensions { width: 0, height: 10 })
        );

        scene.set_image_dimensions(10, 10);
        scene.set_indirect_steps(1);
        scene.set_indirect_rays(0);
        assert_eq!(scene.validate(), Err(SceneError::NoIndirectRays { steps: 1 }));
    }
}
