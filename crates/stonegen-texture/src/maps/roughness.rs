//! Roughness map generator.

use rayon::prelude::*;

use super::{quantize, GrayRaster};
use crate::error::GenerateError;
use crate::field::StructureMap;

/// Mid gray in 8-bit units; the roughness factor scales around it.
const MID_GRAY: f64 = 127.5;

/// Roughness map generator.
///
/// Recesses are rough and peaks are smooth: `(1 - s) * 255`, optionally
/// pushed away from (factor > 1) or towards (factor < 1) mid gray.
pub struct RoughnessGenerator {
    /// Contrast multiplier around mid gray. 1.0 leaves the ramp untouched.
    pub factor: f64,
}

impl RoughnessGenerator {
    /// Create a new roughness generator.
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// Roughness in 8-bit units before quantization, clamped to `[0, 255]`.
    #[inline]
    pub fn level(&self, s: f32) -> f32 {
        let base = (1.0 - s as f64) * 255.0;
        let level = if self.factor != 1.0 {
            (base - MID_GRAY) * self.factor + MID_GRAY
        } else {
            base
        };
        level.clamp(0.0, 255.0) as f32
    }

    /// Generate a roughness map from the structure map.
    pub fn generate(&self, structure: &StructureMap) -> Result<GrayRaster, GenerateError> {
        let mut raster =
            GrayRaster::try_new(structure.width(), structure.height(), "roughness map")?;

        raster
            .data
            .par_iter_mut()
            .zip(structure.data().par_iter())
            .for_each(|(out, &s)| *out = quantize(self.level(s)));

        Ok(raster)
    }
}
