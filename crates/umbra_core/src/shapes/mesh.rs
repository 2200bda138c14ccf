//! Triangle meshes.
//!
//! A mesh is a flat list of triangles searched linearly. Meshes come from OBJ
//! files or from the procedural generators below.

use std::io::BufRead;
use std::path::Path;

use thiserror::Error;
use umbra_math::{Ray, Vec3};

use super::{nearest_of, Primitive, Triangle};

/// Errors that can occur while building a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("mesh has no triangles")]
    Empty,

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },
}

/// A composite shape made of many triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a mesh from already-built triangles.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Result<Self, MeshError> {
        if triangles.is_empty() {
            return Err(MeshError::Empty);
        }
        Ok(Self { triangles })
    }

    /// Create a mesh from a vertex list and a flat triangle index list.
    pub fn from_indexed(positions: &[Vec3], indices: &[usize]) -> Result<Self, MeshError> {
        let vertex = |index: usize| {
            positions.get(index).copied().ok_or(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            })
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|tri| Ok(Triangle::new(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?)))
            .collect::<Result<Vec<_>, MeshError>>()?;

        Self::from_triangles(triangles)
    }

    /// Load every model in an OBJ file into one mesh.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
        let mesh = Self::from_models(&models)?;
        log::info!(
            "Loaded {} triangles from {} models in {}",
            mesh.len(),
            models.len(),
            path.display()
        );
        Ok(mesh)
    }

    /// Parse OBJ data from a reader. Material libraries are ignored.
    pub fn from_obj_reader<R: BufRead>(reader: &mut R) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        Self::from_models(&models)
    }

    fn from_models(models: &[tobj::Model]) -> Result<Self, MeshError> {
        let mut triangles = Vec::new();
        for model in models {
            let positions: Vec<Vec3> = model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect();
            if model.mesh.indices.is_empty() {
                log::warn!("OBJ model '{}' has no faces", model.name);
                continue;
            }
            let indices: Vec<usize> = model.mesh.indices.iter().map(|&i| i as usize).collect();
            triangles.extend(Self::from_indexed(&positions, &indices)?.triangles);
        }
        Self::from_triangles(triangles)
    }

    /// Axis-aligned box as twelve outward-facing triangles.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ];
        Self {
            triangles: Self::cuboid_triangles(&corners),
        }
    }

    fn cuboid_triangles(c: &[Vec3; 8]) -> Vec<Triangle> {
        // Counter-clockwise seen from outside
        const QUADS: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // -Z
            [4, 5, 6, 7], // +Z
            [0, 1, 5, 4], // -Y
            [3, 7, 6, 2], // +Y
            [0, 4, 7, 3], // -X
            [1, 2, 6, 5], // +X
        ];
        QUADS
            .iter()
            .flat_map(|q| {
                [
                    Triangle::new(c[q[0]], c[q[1]], c[q[2]]),
                    Triangle::new(c[q[0]], c[q[2]], c[q[3]]),
                ]
            })
            .collect()
    }

    /// Regular icosahedron inscribed in the sphere `(center, radius)`.
    pub fn icosahedron(center: Vec3, radius: f32) -> Self {
        let phi = (1.0 + 5f32.sqrt()) / 2.0;
        let raw = [
            Vec3::new(-1.0, phi, 0.0),
            Vec3::new(1.0, phi, 0.0),
            Vec3::new(-1.0, -phi, 0.0),
            Vec3::new(1.0, -phi, 0.0),
            Vec3::new(0.0, -1.0, phi),
            Vec3::new(0.0, 1.0, phi),
            Vec3::new(0.0, -1.0, -phi),
            Vec3::new(0.0, 1.0, -phi),
            Vec3::new(phi, 0.0, -1.0),
            Vec3::new(phi, 0.0, 1.0),
            Vec3::new(-phi, 0.0, -1.0),
            Vec3::new(-phi, 0.0, 1.0),
        ];
        let vertices: Vec<Vec3> = raw.iter().map(|v| center + v.normalize() * radius).collect();
        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        let triangles = FACES
            .iter()
            .map(|f| Triangle::new(vertices[f[0]], vertices[f[1]], vertices[f[2]]))
            .collect();
        Self { triangles }
    }

    /// Menger sponge of the given recursion level, as a cube of side `size`
    /// centered at `center`. Level 0 is a plain cube.
    pub fn menger_sponge(center: Vec3, size: f32, level: u32) -> Self {
        let mut cubes = vec![(center, size)];
        for _ in 0..level {
            cubes = cubes
                .into_iter()
                .flat_map(|(c, s)| {
                    let step = s / 3.0;
                    let mut children = Vec::with_capacity(20);
                    for x in -1i32..=1 {
                        for y in -1i32..=1 {
                            for z in -1i32..=1 {
                                // Drop the center cube and the six face centers
                                let zeros = [x, y, z].iter().filter(|&&k| k == 0).count();
                                if zeros >= 2 {
                                    continue;
                                }
                                let offset = Vec3::new(x as f32, y as f32, z as f32) * step;
                                children.push((c + offset, step));
                            }
                        }
                    }
                    children
                })
                .collect();
        }

        let triangles = cubes
            .iter()
            .flat_map(|&(c, s)| {
                let half = Vec3::splat(s / 2.0);
                Self::cuboid(c - half, c + half).triangles
            })
            .collect();
        Self { triangles }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The triangle nearest along `ray` and its distance.
    pub fn nearest_face(&self, ray: &Ray) -> Option<(&Triangle, f32)> {
        nearest_of(&self.triangles, ray)
    }

    /// Point-in-solid test by crossing parity, meaningful for closed meshes.
    pub fn contains(&self, point: Vec3) -> bool {
        // Skewed direction to stay clear of shared edges in axis-aligned meshes
        let parity_ray = Ray::new(point, Vec3::new(0.5773, 0.5774, 0.5775));
        let crossings = self
            .triangles
            .iter()
            .filter(|tri| tri.intersect(&parity_ray).is_finite())
            .count();
        crossings % 2 == 1
    }
}
