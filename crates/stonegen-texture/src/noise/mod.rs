//! Noise synthesis.
//!
//! Value noise only: random lattices smoothed by bilinear reconstruction.
//! There is no gradient noise and no wrap-around, so layers do not tile.

mod fbm;
mod lattice;

pub use fbm::ValueFbm;
pub use lattice::{lattice_dim, AxisTaps, Lattice};

use crate::error::GenerateError;
use crate::field::NoiseLayer;

/// Render one fractal noise layer.
///
/// Octave `o` uses frequency `scale / min(width, height) * lacunarity^o`
/// and amplitude `persistence^o`; the result is divided by the total
/// amplitude.
pub fn generate_layer(
    width: u32,
    height: u32,
    scale: f64,
    seed: u32,
    persistence: f64,
    lacunarity: f64,
    octaves: u8,
) -> Result<NoiseLayer, GenerateError> {
    ValueFbm::new(seed)
        .with_scale(scale)
        .with_persistence(persistence)
        .with_lacunarity(lacunarity)
        .with_octaves(octaves)
        .generate(width, height)
}
