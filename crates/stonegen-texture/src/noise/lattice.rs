//! Random value lattices and their bilinear reconstruction.

use crate::error::{buffer_len, try_alloc, GenerateError};
use crate::rng::DeterministicRng;

/// A coarse grid of uniform random values in [0, 1).
#[derive(Debug, Clone)]
pub struct Lattice {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

impl Lattice {
    /// Fill a `width` x `height` lattice from `rng`, row-major.
    pub fn random(
        width: u32,
        height: u32,
        rng: &mut DeterministicRng,
    ) -> Result<Self, GenerateError> {
        let len = buffer_len(width, height, 1, "noise lattice")?;
        let mut values = try_alloc(len, 0.0f32, "noise lattice")?;
        rng.fill_unit(&mut values);
        Ok(Self {
            width,
            height,
            values,
        })
    }

    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.values[start..start + w]
    }
}

/// Lattice size along one axis for an output length and octave frequency.
///
/// `round(len * frequency) + 1`, clamped to `[1, len]` so that small
/// outputs never sample a lattice finer than themselves. An overflowing
/// cell count clamps to `len`.
pub fn lattice_dim(len: u32, frequency: f64) -> u32 {
    let cells = (len as f64 * frequency).round();
    let cells = if cells > 0.0 {
        cells.min(u32::MAX as f64) as u32
    } else {
        0
    };
    cells.saturating_add(1).clamp(1, len.max(1))
}

/// Precomputed source taps for resampling one axis.
///
/// Output pixel `i` maps to source position `(i + 0.5) * src / dst - 0.5`
/// (pixel-center alignment), clamped to `[0, src - 1]`. The sample is the
/// linear blend of the two neighbouring source cells.
#[derive(Debug, Clone)]
pub struct AxisTaps {
    taps: Vec<(u32, u32, f32)>,
}

impl AxisTaps {
    pub fn new(src: u32, dst: u32) -> Self {
        let last = src.saturating_sub(1);
        let ratio = src as f64 / dst as f64;
        let taps = (0..dst)
            .map(|i| {
                let center = ((i as f64 + 0.5) * ratio - 0.5).clamp(0.0, last as f64);
                let i0 = center.floor() as u32;
                let i1 = (i0 + 1).min(last);
                (i0, i1, (center - i0 as f64) as f32)
            })
            .collect();
        Self { taps }
    }

    /// `(lower index, upper index, weight of upper)` for output pixel `i`.
    #[inline]
    pub fn at(&self, i: usize) -> (u32, u32, f32) {
        self.taps[i]
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Bilinear sample of `lattice` for one output row, accumulated into `out`
/// with weight `amplitude`.
pub(crate) fn accumulate_row(
    lattice: &Lattice,
    xs: &AxisTaps,
    (y0, y1, ty): (u32, u32, f32),
    amplitude: f32,
    out: &mut [f32],
) {
    let r0 = lattice.row(y0);
    let r1 = lattice.row(y1);
    for (x, v) in out.iter_mut().enumerate() {
        let (x0, x1, tx) = xs.at(x);
        let top = lerp(r0[x0 as usize], r0[x1 as usize], tx);
        let bottom = lerp(r1[x0 as usize], r1[x1 as usize], tx);
        *v += lerp(top, bottom, ty) * amplitude;
    }
}
