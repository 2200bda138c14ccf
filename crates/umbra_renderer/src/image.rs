//! Render output and its serialization.
//!
//! Pixels stay unclamped floats until they are written out; tone mapping is
//! chosen per save with [`SaveMode`].

use std::ops::{Index, IndexMut};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder, ImageError, ImageFormat};
use umbra_math::{Color, ColorExt, Interval, BLACK};

/// Gamma used by [`SaveMode::Gamma`].
pub const DISPLAY_GAMMA: f32 = 2.2;

/// How linear radiance is mapped to 8-bit channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveMode {
    /// Divide everything by the brightest channel in the image.
    #[default]
    DimToWhite,
    /// Clamp channels to [0, 1].
    Clamp,
    /// Gamma-correct with 2.2, then clamp.
    Gamma,
}

/// Row-major buffer of linear colours.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Get the pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.offset(x, y)]
    }

    /// Set the pixel at column `x`, row `y`.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        self.pixels[offset] = color;
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Largest channel value in the image.
    pub fn max_channel(&self) -> f32 {
        self.pixels
            .iter()
            .map(|c| c.max_element())
            .fold(0.0, f32::max)
    }

    /// Tone-map to interleaved 8-bit RGB.
    pub fn to_rgb8(&self, mode: SaveMode) -> Vec<u8> {
        let scale = match mode {
            SaveMode::DimToWhite => {
                let max = self.max_channel();
                if max > 0.0 {
                    1.0 / max
                } else {
                    1.0
                }
            }
            SaveMode::Clamp | SaveMode::Gamma => 1.0,
        };

        self.pixels
            .iter()
            .flat_map(|&color| {
                let mapped = match mode {
                    SaveMode::DimToWhite => (color * scale).clamp01(),
                    SaveMode::Clamp => color.clamp01(),
                    SaveMode::Gamma => color.gamma_correct(DISPLAY_GAMMA).clamp01(),
                };
                mapped.to_array().map(quantize)
            })
            .collect()
    }

    /// Encode as a binary PPM (P6).
    pub fn encode_ppm(&self, mode: SaveMode) -> Result<Vec<u8>, ImageError> {
        let mut bytes = Vec::new();
        PnmEncoder::new(&mut bytes)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(&self.to_rgb8(mode), self.width, self.height, ColorType::Rgb8)?;
        Ok(bytes)
    }

    /// Decode PPM data into an image with channels in [0, 1].
    pub fn decode_ppm(bytes: &[u8]) -> Result<Self, ImageError> {
        let rgb = image::load_from_memory_with_format(bytes, ImageFormat::Pnm)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| Color::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Save to `path`. The format follows the extension; `.ppm` files are
    /// written as binary P6.
    pub fn save(&self, path: impl AsRef<Path>, mode: SaveMode) -> Result<(), ImageError> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            std::fs::write(path, self.encode_ppm(mode)?)?;
        } else {
            image::save_buffer(path, &self.to_rgb8(mode), self.width, self.height, ColorType::Rgb8)?;
        }
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[inline]
fn quantize(channel: f32) -> u8 {
    (Interval::UNIT.clamp(channel) * 255.0).round() as u8
}

impl Index<usize> for ImageBuffer {
    type Output = [Color];

    /// Row `row` of the image.
    fn index(&self, row: usize) -> &[Color] {
        let width = self.width as usize;
        &self.pixels[row * width..(row + 1) * width]
    }
}

impl IndexMut<usize> for ImageBuffer {
    fn index_mut(&mut self, row: usize) -> &mut [Color] {
        let width = self.width as usize;
        &mut self.pixels[row * width..(row + 1) * width]
    }
}
