//! Light transport for a single camera ray.
//!
//! The colour of a ray is the direct light at its first hit plus, while bounce
//! depth remains, the average of `indirect_rays` Russian-roulette bounces.
//! Only the primary hit splits into several indirect rays; deeper bounces
//! follow a single path each.

use rand::RngCore;
use umbra_core::{LightSource, Material, Scene};
use umbra_math::{Color, Ray, BLACK, EPSILON, WHITE};

use crate::intersection::{nearest, occluded};
use crate::scatter::{russian_roulette, ColoredRay, SurfacePoint};

/// Paths whose throughput falls to this level in every channel stop
/// bouncing.
pub const MIN_PATH_WEIGHT: f32 = 1e-3;

/// Computes radiance along rays through a scene.
#[derive(Debug, Clone, Copy)]
pub struct Integrator<'a> {
    scene: &'a Scene,
}

impl<'a> Integrator<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Colour seen along a primary ray.
    pub fn pixel_color(&self, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        let depth = if self.scene.has_indirect_lighting() {
            self.scene.indirect_steps()
        } else {
            0
        };
        self.trace(
            &ColoredRay::new(*ray, WHITE),
            depth,
            self.scene.indirect_rays(),
            rng,
        )
    }

    /// Radiance carried back along `ray`, already scaled by its throughput.
    ///
    /// `depth` is the number of bounces left and `samples` the number of
    /// indirect rays to spawn at this hit.
    pub fn trace(
        &self,
        ray: &ColoredRay,
        depth: u32,
        samples: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let Some(hit) = nearest(self.scene.shapes(), &ray.ray) else {
            return BLACK;
        };

        if let Some(emission) = hit.shape.emission() {
            return ray.color * emission;
        }

        let point = hit.point(&ray.ray);
        let surface = SurfacePoint::new(point, hit.face.normal(point), ray.ray.direction());
        let material = hit.shape.material();

        let mut color = ray.color * self.direct_light(material, &surface);

        if depth > 0 && samples > 0 && ray.color.max_element() > MIN_PATH_WEIGHT {
            let mut indirect = BLACK;
            for _ in 0..samples {
                if let Some(next) =
                    russian_roulette(material, hit.shape.refractive_index(), &surface, ray, rng)
                {
                    indirect += self.trace(&next, depth - 1, 1, rng);
                }
            }
            color += indirect / samples as f32;
        }

        color
    }

    /// Light reaching `surface` straight from the scene's lights and
    /// reflected toward the viewer.
    pub fn direct_light(&self, material: &Material, surface: &SurfacePoint) -> Color {
        self.scene
            .lights()
            .iter()
            .map(|light| self.light_contribution(light, material, surface))
            .sum()
    }

    /// One light's contribution, averaged over its sample points.
    fn light_contribution(
        &self,
        light: &LightSource,
        material: &Material,
        surface: &SurfacePoint,
    ) -> Color {
        let points = light.points();
        if points.is_empty() {
            return BLACK;
        }

        let to_viewer = -surface.incoming;
        let total: Color = points
            .iter()
            .filter_map(|&light_point| {
                let offset = light_point - surface.point;
                let distance = offset.length();
                if distance < EPSILON {
                    return None;
                }
                let to_light = offset / distance;
                // Surfaces are lit from both sides
                let cosine = surface.normal.dot(to_light).abs();
                if cosine < EPSILON {
                    return None;
                }
                let shadow = Ray::new(surface.point, to_light);
                if occluded(self.scene.shapes(), &shadow, distance) {
                    return None;
                }
                let brdf = material.phong_brdf(to_viewer, to_light, surface.normal, surface.point);
                Some(light.color_at(light_point, surface.point) * cosine * brdf)
            })
            .sum();

        total / points.len() as f32
    }
}
