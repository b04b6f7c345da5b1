//! Normal map generator.

use rayon::prelude::*;

use super::{quantize, RgbRaster};
use crate::error::GenerateError;
use crate::field::StructureMap;

/// Depth strength is multiplied by this before scaling the gradient.
pub const DEPTH_GAIN: f64 = 10.0;

/// Normal map generator.
pub struct NormalGenerator {
    /// Multiplier applied to both gradient components. May be infinite.
    pub strength: f64,
}

impl NormalGenerator {
    /// Create a new normal generator with unit strength.
    pub fn new() -> Self {
        Self { strength: 1.0 }
    }

    /// Set the gradient strength from a user-facing depth value.
    pub fn with_depth(mut self, depth_strength: f64) -> Self {
        self.strength = depth_strength * DEPTH_GAIN;
        self
    }

    /// Unit surface normal at `(x, y)` in OpenGL (Y-up) convention.
    pub fn normal_vector(&self, structure: &StructureMap, x: u32, y: u32) -> [f32; 3] {
        let (gx, gy) = gradient(structure.data(), structure.width(), structure.height(), x, y);
        unit_normal(gx, gy, self.strength)
    }

    /// Generate a normal map from the structure map.
    pub fn generate(&self, structure: &StructureMap) -> Result<RgbRaster, GenerateError> {
        let width = structure.width();
        let height = structure.height();
        let mut raster = RgbRaster::try_new(width, height, "normal map")?;
        let samples = structure.data();

        raster
            .data
            .par_chunks_mut(width as usize * 3)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(3).enumerate() {
                    let (gx, gy) = gradient(samples, width, height, x as u32, y as u32);
                    let n = unit_normal(gx, gy, self.strength);
                    for c in 0..3 {
                        px[c] = encode_component(n[c]);
                    }
                }
            });

        Ok(raster)
    }
}

impl Default for NormalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Gradient along one axis of length `len` at index `i`.
///
/// Central difference inside, one-sided difference on the first and last
/// sample, zero when the axis has a single sample.
#[inline]
fn axis_derivative(len: u32, i: u32, at: impl Fn(u32) -> f32) -> f32 {
    if len < 2 {
        0.0
    } else if i == 0 {
        at(1) - at(0)
    } else if i == len - 1 {
        at(i) - at(i - 1)
    } else {
        (at(i + 1) - at(i - 1)) * 0.5
    }
}

/// `(d/dx, d/dy)` of a row-major field at `(x, y)`, y pointing down the image.
#[inline]
fn gradient(samples: &[f32], width: u32, height: u32, x: u32, y: u32) -> (f32, f32) {
    let w = width as usize;
    let row = y as usize * w;
    let gx = axis_derivative(width, x, |i| samples[row + i as usize]);
    let gy = axis_derivative(height, y, |j| samples[j as usize * w + x as usize]);
    (gx, gy)
}

/// Normalize `(-gx * strength, gy * strength, 1)`.
///
/// The gradient direction is factored out before scaling, so any strength,
/// infinite included, yields a finite unit vector.
#[inline]
fn unit_normal(gx: f32, gy: f32, strength: f64) -> [f32; 3] {
    let (gx, gy) = (gx as f64, gy as f64);
    let m = gx.abs().max(gy.abs());
    if m == 0.0 || strength == 0.0 {
        return [0.0, 0.0, 1.0];
    }
    let (ux, uy) = (-gx / m, gy / m);
    let k = m * strength;
    let [x, y, z] = if k >= 1.0 {
        [ux, uy, 1.0 / k]
    } else {
        [ux * k, uy * k, 1.0]
    };
    let len = (x * x + y * y + z * z).sqrt();
    [(x / len) as f32, (y / len) as f32, (z / len) as f32]
}

/// Map a component from [-1, 1] to [0, 255].
#[inline]
fn encode_component(c: f32) -> u8 {
    quantize((c + 1.0) * 0.5 * 255.0)
}
