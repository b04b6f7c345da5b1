//! Scalar fields: noise layers and the structure map.

use rayon::prelude::*;

use crate::error::{buffer_len, try_alloc, GenerateError};

/// A dense row-major grid of `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Width in samples.
    pub width: u32,
    /// Height in samples.
    pub height: u32,
    /// Sample data (row-major).
    pub data: Vec<f32>,
}

/// One fractal noise layer over the output resolution.
pub type NoiseLayer = Field;

impl Field {
    /// Allocate a field filled with `fill`.
    pub fn try_new(
        width: u32,
        height: u32,
        fill: f32,
        what: &'static str,
    ) -> Result<Self, GenerateError> {
        let len = buffer_len(width, height, 1, what)?;
        Ok(Self {
            width,
            height,
            data: try_alloc(len, fill, what)?,
        })
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Minimum and maximum sample. NaN samples propagate into the result.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .par_iter()
            .fold(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(lo, hi), &v| {
                    if lo.is_nan() || v.is_nan() {
                        (f32::NAN, f32::NAN)
                    } else {
                        (lo.min(v), hi.max(v))
                    }
                },
            )
            .reduce(
                || (f32::INFINITY, f32::NEG_INFINITY),
                |(a_lo, a_hi), (b_lo, b_hi)| {
                    if a_lo.is_nan() || b_lo.is_nan() {
                        (f32::NAN, f32::NAN)
                    } else {
                        (a_lo.min(b_lo), a_hi.max(b_hi))
                    }
                },
            )
    }
}

/// The canonical height field: every sample lies in [0, 1].
///
/// All four material maps are derived from this one field.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureMap {
    field: Field,
}

impl StructureMap {
    /// Wrap a field whose samples are already known to lie in [0, 1].
    pub(crate) fn from_normalized(field: Field) -> Self {
        debug_assert!(field.data.iter().all(|v| (0.0..=1.0).contains(v)));
        Self { field }
    }

    /// Build a structure map from explicit samples.
    ///
    /// Fails with `InvalidParameter` when the length does not match or any
    /// sample lies outside [0, 1].
    pub fn from_values(width: u32, height: u32, data: Vec<f32>) -> Result<Self, GenerateError> {
        let expected = buffer_len(width, height, 1, "structure map")?;
        if data.len() != expected || expected == 0 {
            return Err(GenerateError::InvalidParameter(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        if let Some(bad) = data.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(GenerateError::InvalidParameter(format!(
                "structure samples must be in [0, 1], found {}",
                bad
            )));
        }
        Ok(Self {
            field: Field {
                width,
                height,
                data,
            },
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.field.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.field.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.field.get(x, y)
    }

    /// Samples in row-major order.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.field.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.field.data
    }

    /// Borrow the underlying field.
    pub fn as_field(&self) -> &Field {
        &self.field
    }
}

/// Estimated peak working memory in bytes for one run at `width` x `height`.
///
/// Per pixel the run holds at most: two `f32` grids while composing the
/// height field (base + one warp layer), then the structure map plus the
/// eight output bytes (RGB albedo, RGB normal, roughness, height).
/// Noise lattices are never larger than one grid and are usually tiny.
pub fn estimate_peak_bytes(width: u32, height: u32) -> u64 {
    let pixels = width as u64 * height as u64;
    let compose = pixels * 2 * 4;
    let derive = pixels * 4 + pixels * 8;
    compose.max(derive)
}
