//! Generation parameters for one material run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Rgb8;
use crate::error::{ErrorCode, ParamsError, ValidationError};

/// Amplitude decay per octave.
pub const PERSISTENCE: f64 = 0.5;

/// Frequency growth per octave.
pub const LACUNARITY: f64 = 2.0;

/// Largest supported width or height in pixels.
pub const MAX_RESOLUTION: u32 = 16384;

/// Side length above which a run needs several gigabytes of memory.
pub const HIGH_MEMORY_RESOLUTION: u32 = 8192;

/// Square resolutions offered by the front end.
pub const RESOLUTION_PRESETS: [u32; 5] = [1024, 2048, 4096, 8192, 16384];

/// Valid octave counts.
pub const OCTAVE_RANGE: std::ops::RangeInclusive<u8> = 1..=8;

/// Immutable parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationParams {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Base seed; warp channels use `seed + 1` and `seed + 2`.
    pub seed: u32,
    /// Inverse zoom. Larger values give finer noise.
    pub scale: f64,
    /// Octaves in the base noise layer (1-8).
    pub octaves: u8,
    /// Contrast applied around mid gray after normalization.
    pub contrast: f64,
    /// Normal map relief.
    pub depth_strength: f64,
    /// Contrast-like multiplier for the roughness map around mid gray.
    pub roughness_factor: f64,
    /// Albedo color where the height field is 0.
    pub color1: Rgb8,
    /// Albedo color where the height field is 1.
    pub color2: Rgb8,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            seed: 0,
            scale: 5.0,
            octaves: 5,
            contrast: 1.2,
            depth_strength: 5.0,
            roughness_factor: 1.0,
            color1: Rgb8::new(0x2b, 0x2b, 0x2b),
            color2: Rgb8::new(0x8a, 0x8a, 0x8a),
        }
    }
}

impl GenerationParams {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> GenerationParamsBuilder {
        GenerationParamsBuilder::default()
    }

    /// Parses parameters from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads parameters from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of pixels in each output raster.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// BLAKE3 hash of the parameters with sorted keys.
    ///
    /// Two parameter sets with the same hash produce identical maps.
    pub fn canonical_hash(&self) -> Result<String, ParamsError> {
        // serde_json::Map is ordered by key, so the encoding is canonical.
        let value = serde_json::to_value(self)?;
        let text = serde_json::to_string(&value)?;
        Ok(blake3::hash(text.as_bytes()).to_hex().to_string())
    }
}

/// Builder for [`GenerationParams`].
#[derive(Debug, Clone, Default)]
pub struct GenerationParamsBuilder {
    params: GenerationParams,
}

impl GenerationParamsBuilder {
    /// Sets width and height.
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.params.width = width;
        self.params.height = height;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, seed: u32) -> Self {
        self.params.seed = seed;
        self
    }

    /// Sets the noise scale.
    pub fn scale(mut self, scale: f64) -> Self {
        self.params.scale = scale;
        self
    }

    /// Sets the octave count.
    pub fn octaves(mut self, octaves: u8) -> Self {
        self.params.octaves = octaves;
        self
    }

    /// Sets the contrast.
    pub fn contrast(mut self, contrast: f64) -> Self {
        self.params.contrast = contrast;
        self
    }

    /// Sets the normal map depth strength.
    pub fn depth_strength(mut self, depth_strength: f64) -> Self {
        self.params.depth_strength = depth_strength;
        self
    }

    /// Sets the roughness factor.
    pub fn roughness_factor(mut self, roughness_factor: f64) -> Self {
        self.params.roughness_factor = roughness_factor;
        self
    }

    /// Sets both albedo colors.
    pub fn colors(mut self, color1: Rgb8, color2: Rgb8) -> Self {
        self.params.color1 = color1;
        self.params.color2 = color2;
        self
    }

    /// Finishes the builder. Call [`crate::validate_params`] before generating.
    pub fn build(self) -> GenerationParams {
        self.params
    }
}

/// Parses a seed from user text.
///
/// Accepts decimal integers in `0..=u32::MAX`, surrounding whitespace allowed.
pub fn parse_seed(text: &str) -> Result<u32, ValidationError> {
    text.trim().parse::<u32>().map_err(|e| {
        ValidationError::with_path(
            ErrorCode::InvalidSeed,
            format!("seed must be an integer in 0..={}, got '{}' ({})", u32::MAX, text, e),
            "seed",
        )
    })
}
