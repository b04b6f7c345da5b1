//! Stonegen material generation engine
//!
//! Turns a validated [`GenerationParams`](stonegen_spec::GenerationParams)
//! into a set of four 8-bit PBR maps derived from one fractal height field:
//!
//! - **Albedo**: two-color ramp over the height field (RGB)
//! - **Normal**: tangent-space normals from height gradients (RGB, Y-up)
//! - **Roughness**: inverted height with optional contrast (grayscale)
//! - **Height**: the height field itself (grayscale)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use stonegen_spec::GenerationParams;
//! use stonegen_texture::{generate_maps, save_material_set, NoProgress, PngConfig};
//!
//! let params = GenerationParams::builder().resolution(512, 512).seed(7).build();
//! let maps = generate_maps(&params, &mut NoProgress).unwrap();
//! save_material_set(&maps, Path::new("out"), "Stone", 7, &PngConfig::default()).unwrap();
//! ```
//!
//! # Determinism
//!
//! - Same parameters = byte-identical maps, independent of thread count
//! - PCG32 seeded from the run seed drives all randomness
//! - PNG encoding uses fixed compression settings

pub mod error;
pub mod export;
pub mod field;
pub mod heightfield;
pub mod maps;
pub mod noise;
pub mod pipeline;
pub mod png;
pub mod rng;
pub mod task;

pub use error::GenerateError;
pub use export::{map_file_name, save_material_set, ExportManifest, ExportedMap, DEFAULT_PREFIX};
pub use field::{estimate_peak_bytes, Field, StructureMap};
pub use maps::{GrayRaster, MapKind, MapRef, MaterialMapSet, RgbRaster};
pub use pipeline::{
    generate_maps, generate_maps_with_cancel, CancelToken, GenerationReport, NoProgress,
    Pipeline, PipelineState, ProgressSink, StageTiming,
};
pub use png::{PngConfig, PngError};
pub use task::{submit, TaskEvent, TaskHandle};
