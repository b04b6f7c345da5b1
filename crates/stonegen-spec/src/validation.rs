//! Parameter validation.
//!
//! Every check runs before the pipeline starts; the engine assumes the
//! parameters it receives have passed [`validate_params`].

use crate::error::{
    ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
use crate::params::{GenerationParams, HIGH_MEMORY_RESOLUTION, MAX_RESOLUTION, OCTAVE_RANGE};

/// Validate that the resolution is positive and within [`MAX_RESOLUTION`].
///
/// # Example
/// ```
/// use stonegen_spec::validation::validate_resolution;
///
/// assert!(validate_resolution(1024, 1024).is_ok());
/// assert!(validate_resolution(0, 100).is_err());
/// ```
pub fn validate_resolution(width: u32, height: u32) -> Result<(), ValidationError> {
    if width == 0 || height == 0 {
        return Err(ValidationError::with_path(
            ErrorCode::InvalidResolution,
            format!("resolution must be at least 1x1, got {}x{}", width, height),
            "width/height",
        ));
    }

    if width > MAX_RESOLUTION || height > MAX_RESOLUTION {
        return Err(ValidationError::with_path(
            ErrorCode::InvalidResolution,
            format!(
                "resolution is too large: max is {}x{}, got {}x{}",
                MAX_RESOLUTION, MAX_RESOLUTION, width, height
            ),
            "width/height",
        ));
    }

    Ok(())
}

/// Validate that the octave count lies in [1, 8].
pub fn validate_octaves(octaves: u8) -> Result<(), ValidationError> {
    if !OCTAVE_RANGE.contains(&octaves) {
        return Err(ValidationError::with_path(
            ErrorCode::OctavesOutOfRange,
            format!(
                "octaves must be in [{}, {}], got {}",
                OCTAVE_RANGE.start(),
                OCTAVE_RANGE.end(),
                octaves
            ),
            "octaves",
        ));
    }
    Ok(())
}

/// Validate that a value is finite and strictly positive.
pub fn validate_positive(
    code: ErrorCode,
    name: &str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::with_path(
            code,
            format!("{} must be finite, got {}", name, value),
            name,
        ));
    }
    if value <= 0.0 {
        return Err(ValidationError::with_path(
            code,
            format!("{} must be positive, got {}", name, value),
            name,
        ));
    }
    Ok(())
}

/// Validate that a value is finite and non-negative.
pub fn validate_non_negative(
    code: ErrorCode,
    name: &str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::with_path(
            code,
            format!("{} must be finite, got {}", name, value),
            name,
        ));
    }
    if value < 0.0 {
        return Err(ValidationError::with_path(
            code,
            format!("{} must be non-negative, got {}", name, value),
            name,
        ));
    }
    Ok(())
}

/// Validate a full parameter set, collecting every error and warning.
pub fn validate_params(params: &GenerationParams) -> ValidationResult {
    let mut result = ValidationResult::default();

    let checks = [
        validate_resolution(params.width, params.height),
        validate_octaves(params.octaves),
        validate_positive(ErrorCode::InvalidScale, "scale", params.scale),
        validate_non_negative(ErrorCode::InvalidContrast, "contrast", params.contrast),
        validate_non_negative(
            ErrorCode::InvalidDepthStrength,
            "depth_strength",
            params.depth_strength,
        ),
        validate_non_negative(
            ErrorCode::InvalidRoughnessFactor,
            "roughness_factor",
            params.roughness_factor,
        ),
    ];
    for check in checks {
        if let Err(e) = check {
            result.add_error(e);
        }
    }

    if params.width.max(params.height) > HIGH_MEMORY_RESOLUTION {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::HighMemoryResolution,
            format!(
                "{}x{} needs several gigabytes of working memory",
                params.width, params.height
            ),
            "width/height",
        ));
    }
    if params.width != params.height {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NonSquareResolution,
            format!(
                "non-square resolution {}x{}; noise frequency follows the shorter side",
                params.width, params.height
            ),
            "width/height",
        ));
    }
    if params.contrast == 0.0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::ZeroContrast,
            "contrast 0 produces a flat mid-gray height field",
            "contrast",
        ));
    }

    result
}
