//! Parameter loading: defaults, then a JSON file, then command-line flags.

use std::path::{Path, PathBuf};

use stonegen_spec::{
    parse_seed, validate_params, GenerationParams, Rgb8, ValidationError, ValidationWarning,
};

use crate::cli_args::ParamsArgs;

/// Failure to assemble a parameter set from user input.
#[derive(Debug)]
pub enum InputError {
    /// Parameter file could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Parameter file is not a valid parameter document.
    JsonParse { path: PathBuf, message: String },

    /// One or more values were rejected.
    Invalid(Vec<ValidationError>),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::JsonParse { path, message } => {
                write!(f, "JSON parse error in '{}': {}", path.display(), message)
            }
            InputError::Invalid(errors) => {
                write!(f, "invalid parameters: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A validated parameter set ready for generation.
#[derive(Debug, Clone)]
pub struct LoadedParams {
    pub params: GenerationParams,
    pub warnings: Vec<ValidationWarning>,
}

/// Read a JSON parameter file. Missing fields take their defaults.
pub fn read_params_file(path: &Path) -> Result<GenerationParams, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    GenerationParams::from_json(&text).map_err(|e| InputError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Build the effective parameters without validating their ranges.
///
/// `fallback_seed` is used when neither a file nor `--seed` supplies one.
pub fn resolve_params(
    args: &ParamsArgs,
    fallback_seed: impl FnOnce() -> u32,
) -> Result<GenerationParams, InputError> {
    let mut params = match &args.params_file {
        Some(path) => read_params_file(path)?,
        None => GenerationParams {
            seed: fallback_seed(),
            ..GenerationParams::default()
        },
    };

    let mut errors = Vec::new();

    if let Some(side) = args.resolution {
        params.width = side;
        params.height = side;
    }
    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(height) = args.height {
        params.height = height;
    }
    if let Some(seed) = &args.seed {
        match parse_seed(seed) {
            Ok(seed) => params.seed = seed,
            Err(e) => errors.push(e),
        }
    }
    if let Some(scale) = args.scale {
        params.scale = scale;
    }
    if let Some(octaves) = args.octaves {
        params.octaves = octaves;
    }
    if let Some(contrast) = args.contrast {
        params.contrast = contrast;
    }
    if let Some(depth) = args.depth {
        params.depth_strength = depth;
    }
    if let Some(roughness) = args.roughness {
        params.roughness_factor = roughness;
    }
    for (field, text, slot) in [
        ("color1", &args.color1, &mut params.color1),
        ("color2", &args.color2, &mut params.color2),
    ] {
        if let Some(text) = text {
            match Rgb8::from_hex(text) {
                Ok(color) => *slot = color,
                Err(mut e) => {
                    e.path = Some(field.to_string());
                    errors.push(e);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(params)
    } else {
        Err(InputError::Invalid(errors))
    }
}

/// Resolve and validate the parameters for a generating command.
pub fn load_params(
    args: &ParamsArgs,
    fallback_seed: impl FnOnce() -> u32,
) -> Result<LoadedParams, InputError> {
    let params = resolve_params(args, fallback_seed)?;
    let result = validate_params(&params);
    if !result.is_ok() {
        return Err(InputError::Invalid(result.errors));
    }
    Ok(LoadedParams {
        params,
        warnings: result.warnings,
    })
}

/// Seed derived from the current UNIX time, like a fresh desktop session.
pub fn time_seed() -> u32 {
    (chrono::Utc::now().timestamp() as u64 & u64::from(u32::MAX)) as u32
}
