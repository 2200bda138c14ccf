//! Random direction sampling.

use std::f32::consts::TAU;

use rand::{Rng, RngCore};
use umbra_math::{Frame, Vec3};

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Cosine-weighted direction on the hemisphere around `normal`.
///
/// Density is `cosθ/π`, so a Lambertian BRDF times the cosine cancels it.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let inclination = gen_f32(rng).sqrt().asin();
    let azimuth = TAU * gen_f32(rng);
    Frame::from_axis(normal).spherical_direction(inclination, azimuth)
}

/// Direction distributed as `cos^n(α)` around `axis`, the Phong lobe.
///
/// The density is `(n+1)/(2π)·cos^n(α)`.
pub fn phong_lobe(axis: Vec3, shininess: f32, rng: &mut dyn RngCore) -> Vec3 {
    let cos_alpha = gen_f32(rng).powf(1.0 / (shininess + 1.0));
    let inclination = cos_alpha.clamp(-1.0, 1.0).acos();
    let azimuth = TAU * gen_f32(rng);
    Frame::from_axis(axis).spherical_direction(inclination, azimuth)
}
