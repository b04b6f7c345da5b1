//! Height map generator.

use rayon::prelude::*;

use super::{quantize, GrayRaster};
use crate::error::GenerateError;
use crate::field::StructureMap;

/// Height map generator: the structure map quantized to 8 bits.
#[derive(Default)]
pub struct HeightGenerator;

impl HeightGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a height map from the structure map.
    pub fn generate(&self, structure: &StructureMap) -> Result<GrayRaster, GenerateError> {
        let mut raster = GrayRaster::try_new(structure.width(), structure.height(), "height map")?;

        raster
            .data
            .par_iter_mut()
            .zip(structure.data().par_iter())
            .for_each(|(out, &s)| *out = quantize(s * 255.0));

        Ok(raster)
    }
}
