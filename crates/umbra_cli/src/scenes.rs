//! Sample scenes selectable by name.

use std::collections::BTreeMap;
use std::f32::consts::PI;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use umbra_core::{
    refractive_index, AreaLight, Camera, Cuboid, FinitePlane, Material, MaterialError, Mesh, Plane,
    PointLight, Scene, Shape, Sphere,
};
use umbra_math::{Color, Vec3, BLACK, WHITE};

/// Builds one sample scene.
pub type SceneBuilder = fn() -> Result<Scene, MaterialError>;

/// Name to scene constructor table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: BTreeMap<&'static str, SceneBuilder>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in sample scene.
    pub fn with_samples() -> Self {
        let mut registry = Self::new();
        registry.register("cornell", cornell);
        registry.register("chess_texture", chess_texture);
        registry.register("spheres", many_spheres);
        registry.register("glass_sphere", || refractive_sphere(refractive_index::GLASS));
        registry.register("water_sphere", || refractive_sphere(refractive_index::WATER));
        registry.register("diamond_sphere", || refractive_sphere(refractive_index::DIAMOND));
        registry.register("quartz_sphere", || refractive_sphere(refractive_index::QUARTZ));
        registry.register("glass_sphere_2", glass_slab);
        registry.register("infinite_mirror", facing_mirrors);
        registry.register("indirect", indirect_lighting);
        registry.register("menger_1", || menger(1));
        registry.register("menger_2", || menger(2));
        registry.register("menger_3", || menger(3));
        registry.register("menger_4", || menger(4));
        registry.register("phong_spheres", phong_spheres);
        registry.register("specular_lobe_1", || specular_lobe(3.0));
        registry.register("specular_lobe_2", || specular_lobe(10.0));
        registry.register("specular_lobe_3", || specular_lobe(100.0));
        registry.register("icosahedron", icosahedron);
        registry
    }

    pub fn register(&mut self, name: &'static str, builder: SceneBuilder) {
        self.scenes.insert(name, builder);
    }

    /// Scene names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenes.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Build the scene registered as `name`.
    pub fn build(&self, name: &str) -> Result<Scene> {
        let builder = self
            .scenes
            .get(name)
            .ok_or_else(|| anyhow!("unknown scene '{name}', use --list-scenes to see them all"))?;
        Ok(builder()?)
    }
}

fn lambertian(color: Color) -> Result<Arc<Material>, MaterialError> {
    Material::lambertian(color).map(Arc::new)
}

fn checker_floor(height: f32) -> Result<Shape, MaterialError> {
    let checker = Material::checkerboard(1.0, Color::splat(0.8), Color::splat(0.1), BLACK, 0.0)?;
    Ok(Shape::new(Plane::new(Vec3::new(0.0, height, 0.0), Vec3::Y)).with_material(checker))
}

fn grey_floor(height: f32) -> Result<Shape, MaterialError> {
    Ok(Shape::new(Plane::new(Vec3::new(0.0, height, 0.0), Vec3::Y))
        .with_shared_material(lambertian(Color::splat(0.6))?))
}

/// Closed box spanning [-1, 1] on every axis, open toward the camera, lit by
/// a small area light under the ceiling.
fn cornell_room() -> Result<Scene, MaterialError> {
    let white = lambertian(Color::splat(0.75))?;
    let red = lambertian(Color::new(0.75, 0.15, 0.15))?;
    let green = lambertian(Color::new(0.15, 0.75, 0.15))?;

    let mut scene = Scene::new();
    let walls = [
        // Floor, ceiling, back
        (FinitePlane::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::X * 2.0, Vec3::Z * 2.0), &white),
        (FinitePlane::new(Vec3::new(-1.0, 1.0, -1.0), Vec3::X * 2.0, Vec3::Z * 2.0), &white),
        (FinitePlane::new(Vec3::new(-1.0, -1.0, 1.0), Vec3::X * 2.0, Vec3::Y * 2.0), &white),
        // Left, right
        (FinitePlane::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::Y * 2.0, Vec3::Z * 2.0), &red),
        (FinitePlane::new(Vec3::new(1.0, -1.0, -1.0), Vec3::Y * 2.0, Vec3::Z * 2.0), &green),
    ];
    for (wall, material) in walls {
        scene.add_shape(Shape::new(wall).with_shared_material(material.clone()));
    }

    scene.add_light_source(AreaLight::new(
        Vec3::new(-0.25, 0.98, -0.25),
        Vec3::X * 0.5,
        3,
        Vec3::Z * 0.5,
        3,
        1.5,
        WHITE,
    ));
    scene.set_camera(Camera::new(Vec3::new(0.0, 0.0, -3.4), Vec3::Z, Vec3::Y));
    Ok(scene)
}

fn cornell() -> Result<Scene, MaterialError> {
    let mut scene = cornell_room()?;
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(-0.45, -0.6, 0.35), 0.4)).with_material(Material::mirror()),
    );
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(0.45, -0.65, -0.2), 0.35))
            .with_material(Material::glass())
            .with_refractive_index(refractive_index::GLASS),
    );
    Ok(scene)
}

fn chess_texture() -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(checker_floor(-1.0)?);
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(-1.2, 0.0, 5.0), 1.0))
            .with_material(Material::phong(Color::new(0.6, 0.1, 0.1), Color::splat(0.2), 30.0)?),
    );
    scene.add_shape(Shape::new(Sphere::new(Vec3::new(1.2, 0.0, 6.0), 1.0)).with_material(Material::mirror()));
    scene.add_light_source(PointLight::new(Vec3::new(0.0, 4.0, 2.0), 30.0, WHITE));
    scene.set_camera(Camera::look_at(Vec3::new(0.0, 1.0, -2.0), Vec3::new(0.0, -0.5, 5.0), Vec3::Y));
    Ok(scene)
}

/// Grid of spheres alternating between mirrors and coloured plastic.
fn many_spheres() -> Result<Scene, MaterialError> {
    let plastic = Arc::new(Material::phong(Color::new(0.2, 0.3, 0.6), Color::splat(0.2), 40.0)?);
    let mirror = Arc::new(Material::mirror());

    let mut scene = Scene::new();
    scene.add_shape(grey_floor(-1.0)?);
    for i in 0..4 {
        for j in 0..4 {
            let center = Vec3::new(-3.0 + 2.0 * i as f32, 0.0, 2.0 + 2.0 * j as f32);
            let material = if (i + j) % 2 == 0 { &mirror } else { &plastic };
            scene.add_shape(Shape::new(Sphere::new(center, 0.8)).with_shared_material(material.clone()));
        }
    }
    scene.add_light_source(PointLight::new(Vec3::new(0.0, 8.0, 4.0), 80.0, WHITE));
    scene.set_camera(Camera::look_at(Vec3::new(0.0, 6.0, -6.0), Vec3::new(0.0, 0.0, 5.0), Vec3::Y));
    Ok(scene)
}

/// Transparent sphere of the given medium over a checkerboard.
fn refractive_sphere(index: f32) -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(checker_floor(-1.0)?);
    scene.add_shape(
        Shape::new(Plane::new(Vec3::new(0.0, 0.0, 8.0), -Vec3::Z))
            .with_shared_material(lambertian(Color::new(0.5, 0.6, 0.7))?),
    );
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(0.0, 0.0, 4.0), 1.0))
            .with_material(Material::glass())
            .with_refractive_index(index),
    );
    scene.add_light_source(PointLight::new(Vec3::new(2.0, 4.0, 0.0), 25.0, WHITE));
    Ok(scene)
}

/// Sphere seen through a slab of glass.
fn glass_slab() -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(checker_floor(-1.0)?);
    let front = FinitePlane::new(Vec3::new(-1.5, -1.0, 2.0), Vec3::X * 3.0, Vec3::Y * 3.0);
    scene.add_shape(
        Shape::new(Cuboid::new(front, 0.2))
            .with_material(Material::glass())
            .with_refractive_index(refractive_index::GLASS),
    );
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0))
            .with_material(Material::phong(Color::new(0.1, 0.5, 0.2), Color::splat(0.3), 50.0)?),
    );
    scene.add_light_source(PointLight::new(Vec3::new(-2.0, 4.0, 1.0), 30.0, WHITE));
    Ok(scene)
}

/// Two mirrors facing each other with a sphere in between.
fn facing_mirrors() -> Result<Scene, MaterialError> {
    let mirror = Arc::new(Material::mirror());
    let mut scene = Scene::new();
    scene.add_shape(grey_floor(-1.0)?);
    for z in [-1.0, 6.0] {
        let glass = FinitePlane::new(Vec3::new(-4.0, -1.0, z), Vec3::X * 8.0, Vec3::Y * 6.0);
        scene.add_shape(Shape::new(glass).with_shared_material(mirror.clone()));
    }
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(0.0, 0.0, 2.5), 0.7))
            .with_material(Material::lambertian(Color::new(0.8, 0.2, 0.1))?),
    );
    scene.add_light_source(PointLight::new(Vec3::new(0.0, 4.0, 2.5), 40.0, WHITE));
    scene.set_camera(Camera::look_at(Vec3::new(0.5, 1.0, -0.5), Vec3::new(0.0, 0.0, 6.0), Vec3::Y));
    Ok(scene)
}

/// Room lit only by an emissive ceiling panel, so everything visible comes
/// from indirect bounces.
fn indirect_lighting() -> Result<Scene, MaterialError> {
    let white = lambertian(Color::splat(0.75))?;
    let mut scene = Scene::new();
    for plane in [
        Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y),
        Plane::new(Vec3::new(0.0, 2.0, 0.0), -Vec3::Y),
        Plane::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z),
        Plane::new(Vec3::new(-2.5, 0.0, 0.0), Vec3::X),
        Plane::new(Vec3::new(2.5, 0.0, 0.0), -Vec3::X),
    ] {
        scene.add_shape(Shape::new(plane).with_shared_material(white.clone()));
    }
    scene.add_shape(
        Shape::new(FinitePlane::square(Vec3::new(0.0, 1.99, 2.0), -Vec3::Y, 1.0)).with_emission(WHITE, 4.0),
    );
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(-0.8, -0.3, 3.0), 0.7))
            .with_material(Material::phong(Color::new(0.7, 0.5, 0.2), Color::splat(0.2), 20.0)?),
    );
    scene.add_shape(
        Shape::new(Cuboid::axis_aligned(Vec3::new(0.4, -1.0, 2.2), Vec3::new(1.4, 0.2, 3.2)))
            .with_material(Material::lambertian(Color::new(0.2, 0.4, 0.7))?),
    );
    scene.set_camera(Camera::look_at(Vec3::new(0.0, 0.5, -2.0), Vec3::new(0.0, -0.5, 3.0), Vec3::Y));
    Ok(scene)
}

fn menger(level: u32) -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(grey_floor(-1.0)?);
    scene.add_shape(
        Shape::new(Mesh::menger_sponge(Vec3::new(0.0, 0.0, 4.0), 2.0, level))
            .with_material(Material::lambertian(Color::new(0.7, 0.6, 0.3))?),
    );
    scene.add_light_source(PointLight::new(Vec3::new(3.0, 4.0, 0.0), 40.0, WHITE));
    scene.set_camera(Camera::look_at(Vec3::new(2.5, 2.5, 0.5), Vec3::new(0.0, 0.0, 4.0), Vec3::Y));
    Ok(scene)
}

/// Row of spheres with increasingly tight highlights.
fn phong_spheres() -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(grey_floor(-1.0)?);
    for (i, shininess) in [1.0, 5.0, 20.0, 80.0, 300.0].into_iter().enumerate() {
        let center = Vec3::new(-4.0 + 2.0 * i as f32, 0.0, 6.0);
        let material = Material::phong(Color::new(0.5, 0.1, 0.1), Color::splat(0.4), shininess)?;
        scene.add_shape(Shape::new(Sphere::new(center, 0.9)).with_material(material));
    }
    scene.add_light_source(PointLight::new(Vec3::new(0.0, 5.0, 2.0), 50.0, WHITE));
    scene.set_camera(
        Camera::look_at(Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, 0.0, 6.0), Vec3::Y).with_lens(PI / 2.5, 1.0),
    );
    Ok(scene)
}

/// Glossy sphere whose highlight shape shows the specular lobe.
fn specular_lobe(shininess: f32) -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(grey_floor(-1.0)?);
    scene.add_shape(
        Shape::new(Sphere::new(Vec3::new(0.0, 0.0, 4.0), 1.0))
            .with_material(Material::phong(Color::splat(0.1), Color::splat(0.8), shininess)?),
    );
    scene.add_light_source(PointLight::new(Vec3::new(2.0, 3.0, 1.0), 25.0, WHITE));
    Ok(scene)
}

fn icosahedron() -> Result<Scene, MaterialError> {
    let mut scene = Scene::new();
    scene.add_shape(grey_floor(-1.0)?);
    scene.add_shape(
        Shape::new(Mesh::icosahedron(Vec3::new(0.0, 0.2, 4.0), 1.2))
            .with_material(Material::phong(Color::new(0.2, 0.5, 0.6), Color::splat(0.3), 60.0)?),
    );
    scene.add_light_source(PointLight::new(Vec3::new(-2.0, 4.0, 1.0), 30.0, WHITE));
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_builds_and_validates() {
        let registry = SceneRegistry::with_samples();
        for name in registry.names() {
            let scene = registry.build(name).unwrap();
            assert!(scene.validate().is_ok(), "{name}");
            assert!(!scene.shapes().is_empty(), "{name}");
        }
    }

    #[test]
    fn test_registry_names() {
        let registry = SceneRegistry::with_samples();
        assert!(registry.contains("cornell"));
        assert!(registry.contains("menger_3"));
        assert!(registry.contains("menger_4"));
        assert_eq!(registry.names().count(), 19);

        let names: Vec<_> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_unknown_scene_is_an_error() {
        let registry = SceneRegistry::with_samples();
        let err = registry.build("teapot").unwrap_err();
        assert!(err.to_string().contains("teapot"));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = SceneRegistry::new();
        registry.register("empty", || Ok(Scene::new()));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["empty"]);
        assert!(registry.build("empty").unwrap().shapes().is_empty());
    }

    #[test]
    fn test_refractive_samples_use_their_medium() {
        let registry = SceneRegistry::with_samples();
        let scene = registry.build("diamond_sphere").unwrap();
        assert!(scene
            .shapes()
            .iter()
            .any(|shape| shape.refractive_index() == refractive_index::DIAMOND));
    }
}
