//! Scene render loop.
//!
//! The image is split into contiguous bands of rows. With more than one
//! thread each band is rendered on a rayon pool built for this render, and
//! each worker writes only to its own slice of the output buffer.
//!
//! Every row draws its random numbers from a generator seeded by the render
//! seed and the row index, so a render does not depend on how rows are
//! distributed over threads.

use std::ops::Range;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use thiserror::Error;
use umbra_core::{Scene, SceneError};
use umbra_math::Color;

use crate::image::ImageBuffer;
use crate::integrator::Integrator;

/// Errors that can prevent a render from starting.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Worker threads; 1 renders on the calling thread
    pub threads: usize,
    /// Seed for the per-row random generators
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            seed: 0,
        }
    }
}

/// Render the scene on the calling thread.
pub fn render(scene: &Scene) -> Result<ImageBuffer, RenderError> {
    render_with(scene, &RenderConfig::default())
}

/// Render the scene over `thread_count` row bands.
pub fn render_multi_thread(scene: &Scene, thread_count: usize) -> Result<ImageBuffer, RenderError> {
    render_with(
        scene,
        &RenderConfig {
            threads: thread_count,
            ..RenderConfig::default()
        },
    )
}

/// Render the scene with an explicit configuration.
pub fn render_with(scene: &Scene, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    scene.validate()?;
    if config.threads == 0 {
        return Err(RenderError::InvalidThreadCount);
    }

    let (width, height) = (scene.width(), scene.height());
    let mut image = ImageBuffer::new(width, height);
    let integrator = Integrator::new(scene);
    let bands = row_bands(height, config.threads);

    log::info!(
        "Rendering {}x{} with {} threads ({} shapes, {} lights, {} indirect steps x {} rays)",
        width,
        height,
        bands.len(),
        scene.shapes().len(),
        scene.lights().len(),
        scene.indirect_steps(),
        scene.indirect_rays(),
    );
    let start = Instant::now();

    if bands.len() == 1 {
        render_band(&integrator, 0..height, image.pixels_mut(), config.seed);
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        let band_len = bands[0].len() * width as usize;
        pool.install(|| {
            image
                .pixels_mut()
                .par_chunks_mut(band_len)
                .zip(bands)
                .for_each(|(pixels, rows)| {
                    let band_start = Instant::now();
                    let first_row = rows.start;
                    let last_row = rows.end;
                    render_band(&integrator, rows, pixels, config.seed);
                    log::debug!(
                        "Rows {}..{} done in {:.2?}",
                        first_row,
                        last_row,
                        band_start.elapsed()
                    );
                });
        });
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}

/// Split `height` rows into at most `count` contiguous bands.
///
/// All bands but the last have the same number of rows, so they line up with
/// fixed-size chunks of a row-major buffer. Every row belongs to exactly one
/// band.
pub fn row_bands(height: u32, count: usize) -> Vec<Range<u32>> {
    if height == 0 {
        return Vec::new();
    }
    let count = count.clamp(1, height as usize) as u32;
    let rows_per_band = height.div_ceil(count);
    (0..height)
        .step_by(rows_per_band as usize)
        .map(|start| start..(start + rows_per_band).min(height))
        .collect()
}

/// Seed for the generator of one image row.
#[inline]
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render `rows` into `pixels`, the row-major slice holding exactly those rows.
fn render_band(integrator: &Integrator, rows: Range<u32>, pixels: &mut [Color], seed: u64) {
    let camera = integrator.scene().camera();
    let width = camera.width() as usize;
    let first_pixel = camera.first_pixel();
    let right_step = camera.right_step();
    let up_step = camera.up_step();

    for (row, line) in rows.zip(pixels.chunks_mut(width)) {
        let mut rng = StdRng::seed_from_u64(row_seed(seed, row));
        let mut target = first_pixel - up_step * row as f32;
        for pixel in line {
            *pixel = integrator.pixel_color(&camera.ray_to(target), &mut rng);
            target += right_step;
        }
    }
}
