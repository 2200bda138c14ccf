//! Surface materials.
//!
//! A material splits incoming light into four weighted lobes: diffuse,
//! specular (Phong), perfect mirror reflection and transmission. Whatever is
//! left after the four weights is absorbed, so the mean weights may not sum to
//! more than one.

use std::f32::consts::PI;

use thiserror::Error;
use umbra_math::{Color, ColorExt, Vec3, BLACK, GRAY, WHITE};

/// Refractive indices of common media.
pub mod refractive_index {
    pub const AIR: f32 = 1.0;
    pub const WATER: f32 = 1.333;
    pub const GLASS: f32 = 1.5;
    pub const QUARTZ: f32 = 1.544;
    pub const DIAMOND: f32 = 2.42;
}

/// Slack allowed on the energy budget for float noise in user input.
const ENERGY_TOLERANCE: f32 = 1e-4;

/// Errors raised when a material would break energy conservation or is
/// otherwise meaningless.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("mean reflectance components sum to {total:.4}, which exceeds 1")]
    EnergyNotConserved { total: f32 },

    #[error("{component} color has a negative channel")]
    NegativeChannel { component: &'static str },

    #[error("shininess must be non-negative, got {0}")]
    NegativeShininess(f32),

    #[error("checkerboard square size must be positive, got {0}")]
    InvalidSquareSize(f32),
}

/// Outcome of a Russian-roulette draw against a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Diffuse,
    Specular,
    Reflective,
    Refractive,
    Absorbed,
}

/// Diffuse reflectance, either constant or varying over space.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffusePattern {
    Solid(Color),
    /// Solid 3D checkerboard of cubes with side `square_size`, centred on
    /// the integer multiples of `square_size` so that axis-aligned floors at
    /// those heights stay inside one layer of cubes.
    Checker {
        square_size: f32,
        even: Color,
        odd: Color,
    },
}

impl DiffusePattern {
    /// Diffuse reflectance at a world-space point.
    pub fn at(&self, point: Vec3) -> Color {
        match self {
            DiffusePattern::Solid(color) => *color,
            DiffusePattern::Checker {
                square_size,
                even,
                odd,
            } => {
                let cell = (point / *square_size + 0.5).floor();
                let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);
                if parity == 0 {
                    *even
                } else {
                    *odd
                }
            }
        }
    }

    /// Every color the pattern can produce.
    fn colors(&self) -> Vec<Color> {
        match self {
            DiffusePattern::Solid(color) => vec![*color],
            DiffusePattern::Checker { even, odd, .. } => vec![*even, *odd],
        }
    }
}

/// A surface reflectance model.
///
/// Construct through [`Material::new`] (or one of the validating helpers) so
/// that every material in a scene respects the energy budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    diffuse: DiffusePattern,
    specular: Color,
    shininess: f32,
    reflectance: Color,
    transmittance: Color,
}

impl Default for Material {
    /// Plain grey Lambertian surface.
    fn default() -> Self {
        Self {
            diffuse: DiffusePattern::Solid(GRAY),
            specular: BLACK,
            shininess: 0.0,
            reflectance: BLACK,
            transmittance: BLACK,
        }
    }
}

impl Material {
    /// Create a material from its four reflectance weights.
    pub fn new(
        diffuse: Color,
        specular: Color,
        shininess: f32,
        reflectance: Color,
        transmittance: Color,
    ) -> Result<Self, MaterialError> {
        Self::with_pattern(
            DiffusePattern::Solid(diffuse),
            specular,
            shininess,
            reflectance,
            transmittance,
        )
    }

    /// Create a material whose diffuse term follows a pattern.
    pub fn with_pattern(
        diffuse: DiffusePattern,
        specular: Color,
        shininess: f32,
        reflectance: Color,
        transmittance: Color,
    ) -> Result<Self, MaterialError> {
        let material = Self {
            diffuse,
            specular,
            shininess,
            reflectance,
            transmittance,
        };
        material.validate()?;
        Ok(material)
    }

    /// Purely diffuse material.
    pub fn lambertian(diffuse: Color) -> Result<Self, MaterialError> {
        Self::new(diffuse, BLACK, 0.0, BLACK, BLACK)
    }

    /// Diffuse plus a Phong specular lobe.
    pub fn phong(diffuse: Color, specular: Color, shininess: f32) -> Result<Self, MaterialError> {
        Self::new(diffuse, specular, shininess, BLACK, BLACK)
    }

    /// Checkerboard diffuse material with an optional specular lobe.
    pub fn checkerboard(
        square_size: f32,
        even: Color,
        odd: Color,
        specular: Color,
        shininess: f32,
    ) -> Result<Self, MaterialError> {
        Self::with_pattern(
            DiffusePattern::Checker {
                square_size,
                even,
                odd,
            },
            specular,
            shininess,
            BLACK,
            BLACK,
        )
    }

    /// Near-perfect mirror.
    pub fn mirror() -> Self {
        Self {
            diffuse: DiffusePattern::Solid(BLACK),
            specular: BLACK,
            shininess: 0.0,
            reflectance: WHITE * 0.9,
            transmittance: BLACK,
        }
    }

    /// Clear dielectric: mostly transmissive with a faint reflection.
    pub fn glass() -> Self {
        Self {
            diffuse: DiffusePattern::Solid(BLACK),
            specular: BLACK,
            shininess: 0.0,
            reflectance: WHITE * 0.05,
            transmittance: WHITE * 0.9,
        }
    }

    /// Absorbs everything. Used by emitting shapes.
    pub fn none() -> Self {
        Self {
            diffuse: DiffusePattern::Solid(BLACK),
            specular: BLACK,
            shininess: 0.0,
            reflectance: BLACK,
            transmittance: BLACK,
        }
    }

    fn validate(&self) -> Result<(), MaterialError> {
        if self.shininess < 0.0 || self.shininess.is_nan() {
            return Err(MaterialError::NegativeShininess(self.shininess));
        }
        if let DiffusePattern::Checker { square_size, .. } = self.diffuse {
            if square_size <= 0.0 || square_size.is_nan() {
                return Err(MaterialError::InvalidSquareSize(square_size));
            }
        }

        let negative = |c: &Color| c.min_element() < 0.0;
        if self.diffuse.colors().iter().any(negative) {
            return Err(MaterialError::NegativeChannel { component: "diffuse" });
        }
        for (component, color) in [
            ("specular", &self.specular),
            ("reflectance", &self.reflectance),
            ("transmittance", &self.transmittance),
        ] {
            if negative(color) {
                return Err(MaterialError::NegativeChannel { component });
            }
        }

        let others = self.specular.mean_rgb()
            + self.reflectance.mean_rgb()
            + self.transmittance.mean_rgb();
        for diffuse in self.diffuse.colors() {
            let total = diffuse.mean_rgb() + others;
            if total > 1.0 + ENERGY_TOLERANCE {
                return Err(MaterialError::EnergyNotConserved { total });
            }
        }
        Ok(())
    }

    /// Diffuse reflectance at a point.
    pub fn diffuse_at(&self, point: Vec3) -> Color {
        self.diffuse.at(point)
    }

    pub fn specular(&self) -> Color {
        self.specular
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn reflectance(&self) -> Color {
        self.reflectance
    }

    pub fn transmittance(&self) -> Color {
        self.transmittance
    }

    /// Pick the interaction for a uniform draw `u` in [0, 1).
    ///
    /// Thresholds are the cumulative mean weights in the order diffuse,
    /// specular, reflective, refractive; the remainder is absorption.
    pub fn classify(&self, u: f32, point: Vec3) -> Interaction {
        let mut threshold = self.diffuse_at(point).mean_rgb();
        if u < threshold {
            return Interaction::Diffuse;
        }
        threshold += self.specular.mean_rgb();
        if u < threshold {
            return Interaction::Specular;
        }
        threshold += self.reflectance.mean_rgb();
        if u < threshold {
            return Interaction::Reflective;
        }
        threshold += self.transmittance.mean_rgb();
        if u < threshold {
            return Interaction::Refractive;
        }
        Interaction::Absorbed
    }

    /// Phong BRDF: `kd/π + ks·(n+2)/(2π)·cos^n(α)`.
    ///
    /// `to_viewer` and `to_light` point away from the surface; `normal` is the
    /// visible normal. `α` is the angle between the viewer and the mirrored
    /// light direction, and back-facing lobes contribute nothing.
    pub fn phong_brdf(&self, to_viewer: Vec3, to_light: Vec3, normal: Vec3, point: Vec3) -> Color {
        let diffuse = self.diffuse_at(point) / PI;
        if self.specular.is_black() {
            return diffuse;
        }
        let mirrored = 2.0 * to_light.dot(normal) * normal - to_light;
        let cosine = mirrored.dot(to_viewer).max(0.0);
        let lobe = (self.shininess + 2.0) / (2.0 * PI) * cosine.powf(self.shininess);
        diffuse + self.specular * lobe
    }
}
