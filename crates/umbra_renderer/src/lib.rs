//! Umbra Renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over the scene types of `umbra_core`:
//!
//! - [`intersection`]: linear-scan nearest-hit and shadow queries
//! - [`scatter`]: Russian-roulette choice of the next bounce
//! - [`integrator`]: direct lighting plus recursive indirect lighting
//! - [`renderer`]: per-pixel loop, optionally split into row bands over a
//!   thread pool
//! - [`image`]: the output buffer and its tone-mapped serialization

pub mod image;
pub mod integrator;
pub mod intersection;
pub mod renderer;
pub mod sampling;
pub mod scatter;

pub use crate::image::{ImageBuffer, SaveMode};
pub use ::image::ImageError;
pub use integrator::{Integrator, MIN_PATH_WEIGHT};
pub use intersection::{nearest, occluded, Hit, SceneQuery};
pub use renderer::{render, render_multi_thread, render_with, row_bands, RenderConfig, RenderError};
pub use sampling::gen_f32;
pub use scatter::{russian_roulette, ColoredRay, SurfacePoint};
