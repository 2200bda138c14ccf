//! Render settings from a JSON file and the command line.
//!
//! Both sources produce a partial [`Settings`]; command-line values are laid
//! over file values and whatever is still missing takes its default.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use umbra_renderer::SaveMode;

pub const DEFAULT_SCENE: &str = "cornell";
pub const DEFAULT_INDIRECT_STEPS: u32 = 1;
pub const DEFAULT_INDIRECT_RAYS: u32 = 64;

/// Tone mapping as spelled in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    DimToWhite,
    Clamp,
    Gamma,
}

impl From<ToneMapping> for SaveMode {
    fn from(mapping: ToneMapping) -> Self {
        match mapping {
            ToneMapping::DimToWhite => SaveMode::DimToWhite,
            ToneMapping::Clamp => SaveMode::Clamp,
            ToneMapping::Gamma => SaveMode::Gamma,
        }
    }
}

/// Partially specified render settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub scene: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub indirect_steps: Option<u32>,
    pub indirect_rays: Option<u32>,
    pub threads: Option<usize>,
    pub seed: Option<u64>,
    pub save_mode: Option<ToneMapping>,
    pub output: Option<PathBuf>,
    /// OBJ mesh added to the scene
    pub obj: Option<PathBuf>,
}

impl Settings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = Self::from_json(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Lay `other` over `self`: every value set in `other` wins.
    pub fn overlay(self, other: Settings) -> Settings {
        Settings {
            scene: other.scene.or(self.scene),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            indirect_steps: other.indirect_steps.or(self.indirect_steps),
            indirect_rays: other.indirect_rays.or(self.indirect_rays),
            threads: other.threads.or(self.threads),
            seed: other.seed.or(self.seed),
            save_mode: other.save_mode.or(self.save_mode),
            output: other.output.or(self.output),
            obj: other.obj.or(self.obj),
        }
    }

    /// Fill in defaults and check the result.
    pub fn resolve(self) -> Result<Options> {
        let resolution = match (self.width, self.height) {
            (Some(width), Some(height)) => {
                if width == 0 || height == 0 {
                    bail!("resolution must be positive, got {width}x{height}");
                }
                Some((width, height))
            }
            (None, None) => None,
            _ => bail!("width and height must be given together"),
        };

        let threads = self.threads.unwrap_or_else(default_threads);
        if threads == 0 {
            bail!("thread count must be at least 1");
        }

        let scene = self.scene.unwrap_or_else(|| DEFAULT_SCENE.to_string());
        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{scene}.ppm")));

        Ok(Options {
            resolution,
            indirect_steps: self.indirect_steps.unwrap_or(DEFAULT_INDIRECT_STEPS),
            indirect_rays: self.indirect_rays.unwrap_or(DEFAULT_INDIRECT_RAYS),
            threads,
            seed: self.seed.unwrap_or(0),
            save_mode: self.save_mode.map(SaveMode::from).unwrap_or_default(),
            output,
            obj: self.obj,
            scene,
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub scene: String,
    /// Overrides the scene's own resolution when set
    pub resolution: Option<(u32, u32)>,
    pub indirect_steps: u32,
    pub indirect_rays: u32,
    pub threads: usize,
    pub seed: u64,
    pub save_mode: SaveMode,
    pub output: PathBuf,
    pub obj: Option<PathBuf>,
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_resolution(text: &str) -> Result<(u32, u32)> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .with_context(|| format!("resolution '{text}' is not of the form WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .with_context(|| format!("invalid width in resolution '{text}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .with_context(|| format!("invalid height in resolution '{text}'"))?;
    if width == 0 || height == 0 {
        bail!("resolution must be positive, got {width}x{height}");
    }
    Ok((width, height))
}
