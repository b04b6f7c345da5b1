//! Stonegen parameter library
//!
//! Types, parsing and validation for one procedural stone material run.
//! A run is described by a single immutable [`GenerationParams`] value which
//! front ends build from user input (flags, JSON files, text fields) and
//! validate before handing it to the generation engine.
//!
//! # Example
//!
//! ```
//! use stonegen_spec::{validate_params, GenerationParams, Rgb8};
//!
//! let params = GenerationParams::builder()
//!     .resolution(64, 64)
//!     .seed(42)
//!     .octaves(3)
//!     .colors(Rgb8::from_hex("#2b2b2b").unwrap(), Rgb8::from_hex("#8a8a8a").unwrap())
//!     .build();
//!
//! let warnings = validate_params(&params).into_result().unwrap();
//! assert!(warnings.is_empty());
//! ```

pub mod color;
pub mod error;
pub mod params;
pub mod validation;

pub use color::Rgb8;
pub use error::{
    ErrorCode, ParamsError, ValidationError, ValidationResult, ValidationWarning, WarningCode,
};
pub use params::{
    parse_seed, GenerationParams, GenerationParamsBuilder, HIGH_MEMORY_RESOLUTION, LACUNARITY,
    MAX_RESOLUTION, OCTAVE_RANGE, PERSISTENCE, RESOLUTION_PRESETS,
};
pub use validation::validate_params;
