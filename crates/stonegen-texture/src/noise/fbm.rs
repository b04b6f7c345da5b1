//! Fractal value noise (fBm) rendered over a full raster.

use rayon::prelude::*;

use super::lattice::{accumulate_row, lattice_dim, AxisTaps, Lattice};
use crate::error::GenerateError;
use crate::field::{Field, NoiseLayer};
use crate::rng::DeterministicRng;

/// Fractal value-noise generator.
///
/// Each octave fills a random lattice whose spacing shrinks by the
/// lacunarity, reconstructs it at full resolution with bilinear
/// interpolation, and adds it with an amplitude that decays by the
/// persistence. The sum is divided by the total amplitude, so every sample
/// stays in [0, 1].
#[derive(Debug, Clone)]
pub struct ValueFbm {
    /// Seed of the lattice stream. Octaves draw successively from it.
    seed: u32,
    /// Inverse zoom relative to the shorter output side.
    scale: f64,
    /// Number of octaves to combine.
    octaves: u8,
    /// Amplitude multiplier per octave.
    persistence: f64,
    /// Frequency multiplier per octave.
    lacunarity: f64,
}

impl ValueFbm {
    /// Create a generator with default settings.
    ///
    /// Default: scale 1, 4 octaves, 0.5 persistence, 2.0 lacunarity.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            scale: 1.0,
            octaves: 4,
            persistence: stonegen_spec::PERSISTENCE,
            lacunarity: stonegen_spec::LACUNARITY,
        }
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the number of octaves.
    pub fn with_octaves(mut self, octaves: u8) -> Self {
        self.octaves = octaves.max(1);
        self
    }

    /// Set the persistence.
    pub fn with_persistence(mut self, persistence: f64) -> Self {
        self.persistence = persistence;
        self
    }

    /// Set the lacunarity.
    pub fn with_lacunarity(mut self, lacunarity: f64) -> Self {
        self.lacunarity = lacunarity;
        self
    }

    /// Lattice size of every octave for a `width` x `height` output.
    pub fn lattice_sizes(&self, width: u32, height: u32) -> Vec<(u32, u32)> {
        let mut frequency = self.scale / width.min(height).max(1) as f64;
        let mut sizes = Vec::with_capacity(self.octaves as usize);
        for _ in 0..self.octaves {
            sizes.push((lattice_dim(width, frequency), lattice_dim(height, frequency)));
            frequency *= self.lacunarity;
        }
        sizes
    }

    /// Render the layer at `width` x `height`.
    pub fn generate(&self, width: u32, height: u32) -> Result<NoiseLayer, GenerateError> {
        if width == 0 || height == 0 {
            return Err(GenerateError::InvalidParameter(format!(
                "noise layer must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let mut grid = Field::try_new(width, height, 0.0, "noise layer")?;
        let mut rng = DeterministicRng::new(self.seed);

        let mut amplitude = 1.0f64;
        let mut total_amplitude = 0.0f64;

        for (lw, lh) in self.lattice_sizes(width, height) {
            let lattice = Lattice::random(lw, lh, &mut rng)?;
            let xs = AxisTaps::new(lw, width);
            let ys = AxisTaps::new(lh, height);
            let amp = amplitude as f32;

            grid.data
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| accumulate_row(&lattice, &xs, ys.at(y), amp, row));

            total_amplitude += amplitude;
            amplitude *= self.persistence;
        }

        if !(total_amplitude.is_finite() && total_amplitude > 0.0) {
            return Err(GenerateError::ComputationFailure(format!(
                "noise amplitudes sum to {}",
                total_amplitude
            )));
        }

        let total = total_amplitude as f32;
        grid.data.par_iter_mut().for_each(|v| *v /= total);
        Ok(grid)
    }
}
