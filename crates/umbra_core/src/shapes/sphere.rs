//! Sphere primitive.

use umbra_math::{Ray, Vec3, EPSILON};

use super::Primitive;

/// A sphere given by its center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Primitive for Sphere {
    /// Quadratic solve for a unit-direction ray. Returns the smaller root
    /// beyond `EPSILON`, or the larger one when the origin is inside.
    fn intersect(&self, ray: &Ray) -> f32 {
        if ray.is_degenerate() {
            return f32::INFINITY;
        }
        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return f32::INFINITY;
        }

        let sqrtd = discriminant.sqrt();
        let near = h - sqrtd;
        if near > EPSILON {
            return near;
        }
        let far = h + sqrtd;
        if far > EPSILON {
            far
        } else {
            f32::INFINITY
        }
    }

    fn is_inside(&self, point: Vec3) -> bool {
        point.distance(self.center) <= self.radius + EPSILON
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!((sphere.intersect(&ray) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 3.0), 1.0);

        // Ray pointing away from sphere
        let away = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(sphere.intersect(&away), f32::INFINITY);

        let toward_corner = Ray::new(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(sphere.intersect(&toward_corner), f32::INFINITY);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((sphere.intersect(&ray) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_ignores_origin_on_surface() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        // Leaving the surface outward: the zero root must not count
        let ray = Ray::new(Vec3::X, Vec3::X);
        assert_eq!(sphere.intersect(&ray), f32::INFINITY);
        // Leaving the surface inward: the far side is hit
        let ray = Ray::new(Vec3::X, -Vec3::X);
        assert!((sphere.intersect(&ray) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_hits_lie_on_the_sphere() {
        let sphere = Sphere::new(Vec3::new(0.5, -1.0, 4.0), 1.5);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let ray = Ray::new(origin, direction);
            if ray.is_degenerate() {
                continue;
            }
            let t = sphere.intersect(&ray);

            // Closest approach of the half-line to the center
            let along = ray.direction().dot(sphere.center() - origin).max(0.0);
            let closest = ray.at(along).distance(sphere.center());

            if t.is_finite() {
                let on_surface = ray.at(t).distance(sphere.center());
                assert!((on_surface - sphere.radius()).abs() < 1e-3);
            } else if closest < sphere.radius() - 1e-3 {
                panic!("ray {ray:?} passes within {closest} of the center but missed");
            }
            if closest > sphere.radius() + 1e-3 {
                assert_eq!(t, f32::INFINITY);
            }
        }
    }

    #[test]
    fn test_sphere_normal_and_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        assert_eq!(sphere.normal(Vec3::new(0.0, 2.0, 0.0)), Vec3::Y);
        assert!(sphere.is_inside(Vec3::new(1.0, 1.0, 0.0)));
        assert!(sphere.is_inside(Vec3::new(2.0, 0.0, 0.0)));
        assert!(!sphere.is_inside(Vec3::new(2.0, 2.0, 0.0)));
    }
}
