//! Pinhole camera.
//!
//! The image plane sits `image_plane_distance` in front of the focal point and
//! is sized so that its height spans the vertical field of view. Pixel centres
//! are laid out on a regular grid; row 0 is the top of the image.

use std::f32::consts::PI;

use umbra_math::{Ray, Vec3};

/// Pinhole camera mapping pixels to primary rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    focal_point: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,

    /// Vertical field of view in radians
    fov: f32,
    image_plane_distance: f32,

    width: u32,
    height: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focal_point: Vec3::ZERO,
            front: Vec3::Z,
            up: Vec3::Y,
            right: Vec3::X,
            fov: PI / 3.0,
            image_plane_distance: 1.0,
            width: 256,
            height: 256,
        }
    }
}

impl Camera {
    /// Camera at `focal_point` looking along `front`.
    ///
    /// `up` only needs to be roughly up: it is re-orthogonalized against
    /// `front`. Right is `up × front`, so the default frame is X right, Y up,
    /// Z forward.
    pub fn new(focal_point: Vec3, front: Vec3, up: Vec3) -> Self {
        let front = front.normalize_or_zero();
        let right = up.cross(front).normalize_or_zero();
        let up = front.cross(right);
        Self {
            focal_point,
            front,
            up,
            right,
            ..Self::default()
        }
    }

    /// Camera at `position` looking toward `target`.
    pub fn look_at(position: Vec3, target: Vec3, up_hint: Vec3) -> Self {
        Self::new(position, target - position, up_hint)
    }

    /// Set the vertical field of view (radians) and the image plane distance.
    pub fn with_lens(mut self, fov: f32, image_plane_distance: f32) -> Self {
        self.fov = fov;
        self.image_plane_distance = image_plane_distance;
        self
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn focal_point(&self) -> Vec3 {
        self.focal_point
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn image_plane_distance(&self) -> f32 {
        self.image_plane_distance
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// World-space size of one (square) pixel on the image plane.
    pub fn pixel_size(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        2.0 * self.image_plane_distance * (self.fov / 2.0).tan() / self.height as f32
    }

    /// Offset between horizontally adjacent pixel centres.
    pub fn right_step(&self) -> Vec3 {
        self.right * self.pixel_size()
    }

    /// Offset between vertically adjacent pixel centres, pointing up.
    pub fn up_step(&self) -> Vec3 {
        self.up * self.pixel_size()
    }

    /// Centre of the top-left pixel.
    pub fn first_pixel(&self) -> Vec3 {
        let half_rows = self.height.saturating_sub(1) as f32 / 2.0;
        let half_cols = self.width.saturating_sub(1) as f32 / 2.0;
        self.image_center() + self.up_step() * half_rows - self.right_step() * half_cols
    }

    /// Point where the optical axis pierces the image plane.
    pub fn image_center(&self) -> Vec3 {
        self.focal_point + self.front * self.image_plane_distance
    }

    /// Centre of pixel `(row, col)`.
    pub fn pixel_position(&self, row: u32, col: u32) -> Vec3 {
        self.first_pixel() - self.up_step() * row as f32 + self.right_step() * col as f32
    }

    /// Primary ray from the focal point through `point`.
    #[inline]
    pub fn ray_to(&self, point: Vec3) -> Ray {
        Ray::between(self.focal_point, point)
    }

    /// Primary ray through the centre of pixel `(row, col)`.
    pub fn ray(&self, row: u32, col: u32) -> Ray {
        self.ray_to(self.pixel_position(row, col))
    }
}
