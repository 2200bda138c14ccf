//! Light sources.
//!
//! Every light is a set of sample points. A point light has one; an area light
//! is a grid of point lights spread over a parallelogram. Irradiance falls off
//! with the squared distance to the sample point.

use umbra_math::{Color, Vec3, EPSILON, WHITE};

/// A single point emitting `color × power` in every direction.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    position: Vec3,
    power: f32,
    color: Color,
}

impl PointLight {
    pub fn new(position: Vec3, power: f32, color: Color) -> Self {
        Self {
            position,
            power,
            color,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0, WHITE)
    }
}

/// A parallelogram light approximated by an `n1 × n2` grid of point lights.
///
/// Shading averages over the grid, so the grid resolution changes the
/// softness of shadows but not the brightness of the light.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLight {
    points: Vec<Vec3>,
    power: f32,
    color: Color,
}

impl AreaLight {
    /// Create an area light spanning `corner + s·dir1 + t·dir2`, `s, t ∈
    /// [0, 1]`, sampled at the centres of an `n1 × n2` grid. Zero counts are
    /// raised to one.
    pub fn new(
        corner: Vec3,
        dir1: Vec3,
        n1: usize,
        dir2: Vec3,
        n2: usize,
        power: f32,
        color: Color,
    ) -> Self {
        let n1 = n1.max(1);
        let n2 = n2.max(1);
        let step1 = dir1 / n1 as f32;
        let step2 = dir2 / n2 as f32;
        let first = corner + (step1 + step2) * 0.5;

        let points = (0..n1)
            .flat_map(|i| (0..n2).map(move |j| first + step1 * i as f32 + step2 * j as f32))
            .collect();

        Self {
            points,
            power,
            color,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Power of the whole light.
    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Every kind of light a scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum LightSource {
    Point(PointLight),
    Area(AreaLight),
}

impl LightSource {
    /// Sample points of the light, in a fixed order.
    pub fn points(&self) -> &[Vec3] {
        match self {
            LightSource::Point(light) => std::slice::from_ref(&light.position),
            LightSource::Area(light) => light.points(),
        }
    }

    /// Light arriving at `shading_point` from the sample at `light_point`.
    ///
    /// Shading averages over a light's samples, so each sample carries the
    /// full power of the light.
    pub fn color_at(&self, light_point: Vec3, shading_point: Vec3) -> Color {
        let (color, power) = match self {
            LightSource::Point(light) => (light.color(), light.power()),
            LightSource::Area(light) => (light.color(), light.power()),
        };
        let distance_squared = light_point.distance_squared(shading_point).max(EPSILON);
        color * power / distance_squared
    }
}

impl From<PointLight> for LightSource {
    fn from(light: PointLight) -> Self {
        LightSource::Point(light)
    }
}

impl From<AreaLight> for LightSource {
    fn from(light: AreaLight) -> Self {
        LightSource::Area(light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_single_sample() {
        let light = LightSource::from(PointLight::new(Vec3::new(0.0, 4.0, 0.0), 2.0, WHITE));
        assert_eq!(light.points(), &[Vec3::new(0.0, 4.0, 0.0)]);
    }

    #[test]
    fn test_default_point_light() {
        let light = PointLight::default();
        assert_eq!(light.position(), Vec3::ZERO);
        assert_eq!(light.power(), 1.0);
        assert_eq!(light.color(), WHITE);
    }

    #[test]
    fn test_inverse_square_falloff() {
        let light = LightSource::from(PointLight::new(Vec3::ZERO, 8.0, WHITE));
        let near = light.color_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let far = light.color_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        assert!(near.abs_diff_eq(Vec3::splat(8.0), 1e-5));
        assert!(far.abs_diff_eq(Vec3::splat(2.0), 1e-5));
    }

    #[test]
    fn test_color_at_light_position_is_finite() {
        let light = LightSource::from(PointLight::new(Vec3::ZERO, 1.0, WHITE));
        let color = light.color_at(Vec3::ZERO, Vec3::ZERO);
        assert!(color.is_finite());
    }

    #[test]
    fn test_area_light_grid() {
        let light = AreaLight::new(
            Vec3::new(-1.0, 3.0, -1.0),
            Vec3::X * 2.0,
            2,
            Vec3::Z * 2.0,
            4,
            10.0,
            WHITE,
        );
        let points = light.points();
        assert_eq!(points.len(), 8);
        assert!(points[0].abs_diff_eq(Vec3::new(-0.5, 3.0, -0.75), 1e-6));
        assert!(points[7].abs_diff_eq(Vec3::new(0.5, 3.0, 0.75), 1e-6));

        // Grid samples are centred on the light
        let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;
        assert!(centroid.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
        assert!(points.iter().all(|p| (p.y - 3.0).abs() < 1e-6));
    }

    #[test]
    fn test_area_light_zero_counts() {
        let light = AreaLight::new(Vec3::ZERO, Vec3::X, 0, Vec3::Y, 0, 1.0, WHITE);
        assert_eq!(light.points(), &[Vec3::new(0.5, 0.5, 0.0)]);
    }
}
