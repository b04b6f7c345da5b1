//! Height field construction: base noise, domain warp, normalization, contrast.

use rayon::prelude::*;
use stonegen_spec::{GenerationParams, LACUNARITY, PERSISTENCE};

use crate::error::GenerateError;
use crate::field::{Field, StructureMap};
use crate::noise::generate_layer;

/// Weight of each warp channel added to the base layer.
pub const WARP_WEIGHT: f32 = 0.08;

/// Octaves in each warp channel.
pub const WARP_OCTAVES: u8 = 2;

/// Warp channels use this multiple of the base scale.
pub const WARP_SCALE_FACTOR: f64 = 2.0;

/// Value of every sample when the composed field has no dynamic range.
pub const FLAT_FIELD_VALUE: f32 = 0.5;

/// Independent noise channels of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseChannel {
    Base,
    WarpX,
    WarpY,
}

impl NoiseChannel {
    /// Seed of this channel: `seed`, `seed + 1`, `seed + 2` (wrapping).
    pub fn seed(self, base_seed: u32) -> u32 {
        let offset = match self {
            NoiseChannel::Base => 0,
            NoiseChannel::WarpX => 1,
            NoiseChannel::WarpY => 2,
        };
        base_seed.wrapping_add(offset)
    }
}

/// Whether normalization found a usable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Samples were stretched to exactly [0, 1].
    Stretched,
    /// The field was flat and was replaced by [`FLAT_FIELD_VALUE`].
    Flat,
}

/// Render the base layer.
pub fn generate_base(params: &GenerationParams) -> Result<Field, GenerateError> {
    generate_layer(
        params.width,
        params.height,
        params.scale,
        NoiseChannel::Base.seed(params.seed),
        PERSISTENCE,
        LACUNARITY,
        params.octaves,
    )
}

/// Add both warp channels to `field` with weight [`WARP_WEIGHT`].
///
/// Only one warp layer is alive at a time.
pub fn apply_domain_warp(field: &mut Field, params: &GenerationParams) -> Result<(), GenerateError> {
    for channel in [NoiseChannel::WarpX, NoiseChannel::WarpY] {
        let warp = generate_layer(
            params.width,
            params.height,
            params.scale * WARP_SCALE_FACTOR,
            channel.seed(params.seed),
            PERSISTENCE,
            LACUNARITY,
            WARP_OCTAVES,
        )?;
        field
            .data
            .par_iter_mut()
            .zip(warp.data.par_iter())
            .for_each(|(s, w)| *s += WARP_WEIGHT * w);
    }
    Ok(())
}

/// Stretch `field` to [0, 1] with a global min-max mapping.
///
/// A field with no dynamic range becomes a constant [`FLAT_FIELD_VALUE`].
pub fn normalize(mut field: Field) -> Result<(StructureMap, Normalization), GenerateError> {
    let (lo, hi) = field.min_max();
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(GenerateError::ComputationFailure(format!(
            "height field contains non-finite samples (min {}, max {})",
            lo, hi
        )));
    }

    let range = hi - lo;
    let outcome = if range > 0.0 {
        field
            .data
            .par_iter_mut()
            .for_each(|v| *v = ((*v - lo) / range).clamp(0.0, 1.0));
        Normalization::Stretched
    } else {
        tracing::warn!(value = lo, "height field is flat, substituting mid gray");
        field.data.par_iter_mut().for_each(|v| *v = FLAT_FIELD_VALUE);
        Normalization::Flat
    };

    Ok((StructureMap::from_normalized(field), outcome))
}

/// Contrast curve around mid gray: `clamp((s - 0.5) * contrast + 0.5, 0, 1)`.
///
/// Evaluated in f64: any finite contrast keeps samples finite and in range.
pub fn apply_contrast(map: &mut StructureMap, contrast: f64) {
    map.data_mut().par_iter_mut().for_each(|v| {
        let curved = ((*v as f64 - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
        *v = curved as f32;
    });
}

/// Run every step and return the finished structure map.
pub fn build(params: &GenerationParams) -> Result<StructureMap, GenerateError> {
    let mut field = generate_base(params)?;
    apply_domain_warp(&mut field, params)?;
    let (mut map, _) = normalize(field)?;
    apply_contrast(&mut map, params.contrast);
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: u32, size: u32) -> GenerationParams {
        GenerationParams::builder()
            .resolution(size, size)
            .seed(seed)
            .scale(5.0)
            .octaves(3)
            .contrast(1.0)
            .build()
    }

    #[test]
    fn channel_seeds_wrap() {
        assert_eq!(NoiseChannel::Base.seed(10), 10);
        assert_eq!(NoiseChannel::WarpX.seed(10), 11);
        assert_eq!(NoiseChannel::WarpY.seed(u32::MAX), 1);
    }

    #[test]
    fn normalized_field_spans_unit_interval() {
        let mut field = generate_base(&params(42, 32)).unwrap();
        apply_domain_warp(&mut field, &params(42, 32)).unwrap();
        let (map, outcome) = normalize(field).unwrap();
        assert_eq!(outcome, Normalization::Stretched);
        let (lo, hi) = map.as_field().min_max();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
    }

    #[test]
    fn flat_field_becomes_mid_gray() {
        let field = Field::try_new(8, 8, 0.3, "flat").unwrap();
        let (map, outcome) = normalize(field).unwrap();
        assert_eq!(outcome, Normalization::Flat);
        assert!(map.data().iter().all(|&v| v == FLAT_FIELD_VALUE));
    }

    #[test]
    fn non_finite_field_fails() {
        let mut field = Field::try_new(4, 4, 0.3, "bad").unwrap();
        field.set(2, 2, f32::INFINITY);
        assert!(matches!(
            normalize(field),
            Err(GenerateError::ComputationFailure(_))
        ));
    }

    #[test]
    fn contrast_curve_clamps() {
        let mut map = StructureMap::from_values(4, 1, vec![0.0, 0.25, 0.5, 1.0]).unwrap();
        apply_contrast(&mut map, 2.0);
        assert_eq!(map.data(), &[0.0, 0.0, 0.5, 1.0]);

        let mut map = StructureMap::from_values(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
        apply_contrast(&mut map, 0.0);
        assert_eq!(map.data(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn huge_contrast_stays_in_range() {
        for contrast in [1e39, f64::MAX] {
            let mut map = StructureMap::from_values(3, 1, vec![0.25, 0.5, 0.75]).unwrap();
            apply_contrast(&mut map, contrast);
            assert_eq!(map.data(), &[0.0, 0.5, 1.0]);
        }

        let huge = GenerationParams {
            contrast: 1e39,
            ..params(1, 1)
        };
        assert_eq!(build(&huge).unwrap().data(), &[FLAT_FIELD_VALUE]);
    }

    #[test]
    fn build_is_deterministic_and_bounded() {
        let a = build(&params(9, 24)).unwrap();
        let b = build(&params(9, 24)).unwrap();
        assert_eq!(a, b);
        assert!(a.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn single_pixel_is_flat() {
        let map = build(&params(1, 1)).unwrap();
        assert_eq!(map.data(), &[FLAT_FIELD_VALUE]);
    }
}
