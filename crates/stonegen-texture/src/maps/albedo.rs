//! Albedo map generator.

use rayon::prelude::*;
use stonegen_spec::Rgb8;

use super::{quantize, RgbRaster};
use crate::error::GenerateError;
use crate::field::StructureMap;

/// Albedo map generator: a two-color ramp over the structure map.
pub struct AlbedoGenerator {
    /// Color where the structure is 0 (recesses).
    pub low: Rgb8,
    /// Color where the structure is 1 (peaks).
    pub high: Rgb8,
}

impl AlbedoGenerator {
    /// Create a new albedo generator.
    pub fn new(low: Rgb8, high: Rgb8) -> Self {
        Self { low, high }
    }

    /// Blend `low * (1 - s) + high * s` per channel.
    pub fn generate(&self, structure: &StructureMap) -> Result<RgbRaster, GenerateError> {
        let mut raster = RgbRaster::try_new(structure.width(), structure.height(), "albedo map")?;
        let low = self.low.channels().map(f32::from);
        let high = self.high.channels().map(f32::from);

        raster
            .data
            .par_chunks_mut(3)
            .zip(structure.data().par_iter())
            .for_each(|(px, &s)| {
                for c in 0..3 {
                    px[c] = quantize(low[c] * (1.0 - s) + high[c] * s);
                }
            });

        Ok(raster)
    }
}
