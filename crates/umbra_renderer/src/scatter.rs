//! Russian-roulette path continuation.
//!
//! At each bounce one interaction is drawn with probability equal to its mean
//! reflectance. The continuing ray's colour is then divided by that
//! probability, which keeps the estimate unbiased while letting absorbed
//! paths stop early.

use rand::RngCore;
use umbra_core::{Interaction, Material};
use umbra_math::{Color, ColorExt, Ray, Vec3};

use crate::sampling::{cosine_hemisphere, gen_f32, phong_lobe};

/// A ray together with the throughput accumulated along its path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredRay {
    pub ray: Ray,
    pub color: Color,
}

impl ColoredRay {
    pub fn new(ray: Ray, color: Color) -> Self {
        Self { ray, color }
    }
}

/// Local geometry at a hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub point: Vec3,
    /// Normal facing the incoming ray
    pub normal: Vec3,
    /// True when the ray arrives on the outward side of the surface
    pub front_face: bool,
    /// Unit direction of the incoming ray
    pub incoming: Vec3,
}

impl SurfacePoint {
    /// Build from a geometric normal, flipping it to face the incoming ray.
    pub fn new(point: Vec3, geometric_normal: Vec3, incoming: Vec3) -> Self {
        let front_face = geometric_normal.dot(incoming) <= 0.0;
        let normal = if front_face {
            geometric_normal
        } else {
            -geometric_normal
        };
        Self {
            point,
            normal,
            front_face,
            incoming,
        }
    }
}

/// Mirror `direction` about `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Refract `direction` through a surface whose `normal` faces it, with
/// `eta = n_incident / n_transmitted`. `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-direction.dot(normal)).min(1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some((eta * direction + (eta * cos_i - cos_t) * normal).normalize())
}

/// Draw the next bounce of `incoming` at `surface`.
///
/// Returns `None` when the path is absorbed, either by the roulette draw or
/// because a specular sample ended up below the surface.
pub fn russian_roulette(
    material: &Material,
    refractive_index: f32,
    surface: &SurfacePoint,
    incoming: &ColoredRay,
    rng: &mut dyn RngCore,
) -> Option<ColoredRay> {
    let SurfacePoint {
        point,
        normal,
        front_face,
        incoming: direction,
    } = *surface;

    let (direction, weight) = match material.classify(gen_f32(rng), point) {
        Interaction::Absorbed => return None,
        Interaction::Diffuse => {
            let kd = material.diffuse_at(point);
            (cosine_hemisphere(normal, rng), kd / kd.mean_rgb())
        }
        Interaction::Specular => {
            let ks = material.specular();
            let n = material.shininess();
            let sample = phong_lobe(reflect(direction, normal), n, rng);
            if sample.dot(normal) <= 0.0 {
                return None;
            }
            (sample, ks / ks.mean_rgb())
        }
        Interaction::Reflective => {
            let kr = material.reflectance();
            (reflect(direction, normal), kr / kr.mean_rgb())
        }
        Interaction::Refractive => {
            let kt = material.transmittance();
            let eta = if front_face {
                1.0 / refractive_index
            } else {
                refractive_index
            };
            let refracted =
                refract(direction, normal, eta).unwrap_or_else(|| reflect(direction, normal));
            (refracted, kt / kt.mean_rgb())
        }
    };

    Some(ColoredRay::new(
        Ray::new(point, direction),
        incoming.color * weight,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use umbra_core::{refractive_index, Cuboid};
    use umbra_math::{BLACK, WHITE};

    fn white_ray(direction: Vec3) -> ColoredRay {
        ColoredRay::new(Ray::new(Vec3::new(0.0, 1.0, 0.0), direction), WHITE)
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);
        assert!(r.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0).normalize(), 1e-6));
    }

    #[test]
    fn test_refract_straight_through() {
        let t = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!(t.abs_diff_eq(-Vec3::Y, 1e-6));
    }

    #[test]
    fn test_refract_obeys_snell() {
        let eta = 1.0 / refractive_index::GLASS;
        let d = Vec3::new(0.5, -1.0, 0.0).normalize();
        let t = refract(d, Vec3::Y, eta).unwrap();
        let sin_i = d.x.abs();
        let sin_t = t.x.abs();
        assert!((sin_i - refractive_index::GLASS * sin_t).abs() < 1e-5);
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at a grazing angle
        let d = Vec3::new(1.0, -0.2, 0.0).normalize();
        assert!(refract(d, Vec3::Y, refractive_index::GLASS).is_none());

        let material = Material::new(BLACK, BLACK, 0.0, BLACK, WHITE).unwrap();
        // Geometric normal points down (outward), ray arrives from inside
        let surface = SurfacePoint::new(Vec3::ZERO, -Vec3::Y, d);
        assert!(!surface.front_face);
        let mut rng = StdRng::seed_from_u64(0);
        let next = russian_roulette(&material, refractive_index::GLASS, &surface, &white_ray(d), &mut rng)
            .unwrap();
        // Falls back to the mirror direction
        assert!(next.ray.direction().abs_diff_eq(reflect(d, Vec3::Y), 1e-5));
        assert!(next.color.abs_diff_eq(WHITE, 1e-6));
    }

    #[test]
    fn test_refraction_bends_toward_normal_when_entering() {
        let material = Material::new(BLACK, BLACK, 0.0, BLACK, WHITE).unwrap();
        let d = Vec3::new(0.5, -1.0, 0.0).normalize();
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Y, d);
        assert!(surface.front_face);
        let mut rng = StdRng::seed_from_u64(0);
        let next = russian_roulette(&material, refractive_index::DIAMOND, &surface, &white_ray(d), &mut rng)
            .unwrap();
        let t = next.ray.direction();
        assert!(t.y < 0.0);
        assert!(t.x.abs() < d.x.abs());
    }

    #[test]
    fn test_refraction_through_glass_box() {
        let cube = Cuboid::axis_aligned(Vec3::new(-1.0, -1.0, 2.0), Vec3::new(1.0, 1.0, 4.0));
        let material = Material::new(BLACK, BLACK, 0.0, BLACK, WHITE).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        // Entering through the front face bends toward the normal
        let d = Vec3::new(0.25, 0.0, 1.0).normalize();
        let ray = ColoredRay::new(Ray::new(Vec3::ZERO, d), WHITE);
        let (face, t) = cube.nearest_face(&ray.ray).unwrap();
        let point = ray.ray.at(t);
        let surface = SurfacePoint::new(point, face.normal(), d);
        assert!(surface.front_face);
        let inside = russian_roulette(&material, refractive_index::GLASS, &surface, &ray, &mut rng)
            .unwrap();
        let t_dir = inside.ray.direction();
        assert!(t_dir.z > d.z);
        assert!((d.x - refractive_index::GLASS * t_dir.x).abs() < 1e-5);

        // Leaving through the back face bends away from it again
        let (back, t) = cube.nearest_face(&inside.ray).unwrap();
        let exit = inside.ray.at(t);
        assert!((exit.z - 4.0).abs() < 1e-4);
        let surface = SurfacePoint::new(exit, back.normal(), t_dir);
        assert!(!surface.front_face);
        let out = russian_roulette(&material, refractive_index::GLASS, &surface, &inside, &mut rng)
            .unwrap();
        assert!(out.ray.direction().abs_diff_eq(d, 1e-4), "{}", out.ray.direction());
    }

    #[test]
    fn test_specular_weight_is_normalized_specular() {
        let ks = Color::new(0.6, 0.3, 0.3);
        for shininess in [0.0, 10.0] {
            let material = Material::phong(BLACK, ks, shininess).unwrap();
            let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Y, -Vec3::Y);
            let mut rng = StdRng::seed_from_u64(3);
            let mut bounced = 0;
            for _ in 0..500 {
                if let Some(next) = russian_roulette(&material, 1.0, &surface, &white_ray(-Vec3::Y), &mut rng) {
                    assert!(next.color.abs_diff_eq(ks / 0.4, 1e-5), "{}", next.color);
                    bounced += 1;
                }
            }
            assert!(bounced > 0);
        }
    }

    #[test]
    fn test_absorbing_material_always_terminates() {
        let material = Material::none();
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Y, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!(russian_roulette(&material, 1.0, &surface, &white_ray(-Vec3::Y), &mut rng).is_none());
        }
    }

    #[test]
    fn test_roulette_frequencies_follow_mean_weights() {
        let material = Material::new(
            Color::splat(0.4),
            BLACK,
            0.0,
            Color::splat(0.2),
            BLACK,
        )
        .unwrap();
        let incoming = -Vec3::Y;
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Y, incoming);
        let mirror = reflect(incoming, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(11);

        let n = 20_000;
        let (mut absorbed, mut mirrored, mut diffuse) = (0, 0, 0);
        for _ in 0..n {
            match russian_roulette(&material, 1.0, &surface, &white_ray(incoming), &mut rng) {
                None => absorbed += 1,
                Some(next) if next.ray.direction().abs_diff_eq(mirror, 1e-6) => mirrored += 1,
                Some(next) => {
                    assert!(next.ray.direction().dot(Vec3::Y) >= -1e-5);
                    // kd / mean(kd) for a grey diffuse is one
                    assert!(next.color.abs_diff_eq(WHITE, 1e-5));
                    diffuse += 1;
                }
            }
        }
        let fraction = |count: i32| count as f32 / n as f32;
        assert!((fraction(diffuse) - 0.4).abs() < 0.02);
        assert!((fraction(mirrored) - 0.2).abs() < 0.02);
        assert!((fraction(absorbed) - 0.4).abs() < 0.02);
    }

    #[test]
    fn test_weights_are_non_negative() {
        let material = Material::phong(Color::new(0.3, 0.1, 0.0), Color::new(0.2, 0.2, 0.1), 20.0)
            .unwrap();
        let incoming = Vec3::new(0.3, -1.0, 0.1).normalize();
        let surface = SurfacePoint::new(Vec3::ZERO, Vec3::Y, incoming);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..2000 {
            if let Some(next) = russian_roulette(&material, 1.0, &surface, &white_ray(incoming), &mut rng) {
                assert!(next.color.min_element() >= 0.0);
                assert!(next.ray.direction().dot(Vec3::Y) > -1e-5);
            }
        }
    }
}
