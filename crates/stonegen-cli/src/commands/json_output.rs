//! JSON output types for machine-readable CLI output.
//!
//! Used by the `--json` flag on `generate` and `validate`. Every document has
//! the same envelope: `success`, `errors`, `warnings` and an optional `result`.

use serde::{Deserialize, Serialize};
use stonegen_spec::{GenerationParams, ValidationError, ValidationWarning};
use stonegen_texture::{ExportManifest, StageTiming};

use crate::input::InputError;

/// Stable error codes for CLI-level failures.
///
/// Parameter validation failures pass through their own `E0xx` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Resolution above the high-memory threshold without `--yes`
    pub const HIGH_MEMORY: &str = "CLI_008";
    /// JSON serialization error
    pub const JSON_SERIALIZE: &str = "CLI_009";
    /// Generation error (wraps engine errors)
    pub const GENERATION_ERROR: &str = "CLI_010";
    /// Writing output files failed
    pub const EXPORT_ERROR: &str = "CLI_011";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E002")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Parameter field at fault (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Parameter field concerned (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    /// Effective parameters (when the file parsed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<GenerationParams>,
    /// BLAKE3 hash of the canonical parameter JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params_hash: Option<String>,
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
}

/// Generation result details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    pub params: GenerationParams,
    pub params_hash: String,
    pub out_dir: String,
    pub timestamp: u64,
    pub outputs: Vec<GeneratedFile>,
    pub stages: Vec<StageDuration>,
    pub duration_ms: u64,
}

/// One exported map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Map name (Albedo, Normal, Roughness, Height)
    pub map: String,
    pub path: String,
    /// BLAKE3 hash of the PNG bytes
    pub hash: String,
    pub size_bytes: u64,
}

/// Time spent in one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageDuration {
    pub stage: String,
    pub duration_ms: f64,
}

impl GenerateOutput {
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }
}

/// Converts an InputError to JsonErrors (one per rejected value).
pub fn input_error_to_json(err: &InputError) -> Vec<JsonError> {
    match err {
        InputError::FileRead { path, source } => vec![JsonError::new(
            error_codes::FILE_READ,
            format!("Failed to read file '{}': {}", path.display(), source),
        )
        .with_file(path.display().to_string())],
        InputError::JsonParse { path, message } => vec![JsonError::new(
            error_codes::JSON_PARSE,
            format!("JSON parse error: {}", message),
        )
        .with_file(path.display().to_string())],
        InputError::Invalid(errors) => errors.iter().map(validation_error_to_json).collect(),
    }
}

pub fn validation_error_to_json(err: &ValidationError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref path) = err.path {
        error = error.with_path(path);
    }
    error
}

pub fn validation_warning_to_json(warn: &ValidationWarning) -> JsonWarning {
    JsonWarning {
        code: warn.code.to_string(),
        message: warn.message.clone(),
        path: warn.path.clone(),
    }
}

pub fn manifest_to_json(manifest: &ExportManifest) -> Vec<GeneratedFile> {
    manifest
        .files
        .iter()
        .map(|f| GeneratedFile {
            map: f.kind.file_label().to_string(),
            path: f.path.display().to_string(),
            hash: f.hash.clone(),
            size_bytes: f.size_bytes,
        })
        .collect()
}

pub fn timings_to_json(timings: &[StageTiming]) -> Vec<StageDuration> {
    timings
        .iter()
        .map(|t| StageDuration {
            stage: t.stage.name().to_string(),
            duration_ms: t.duration_ms(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stonegen_spec::ErrorCode;

    #[test]
    fn test_validation_error_keeps_code_and_path() {
        let err = ValidationError::with_path(ErrorCode::OctavesOutOfRange, "too many", "octaves");
        let json = validation_error_to_json(&err);
        assert_eq!(json.code, "E002");
        assert_eq!(json.path.as_deref(), Some("octaves"));
    }

    #[test]
    fn test_failure_envelope_omits_result() {
        let out = GenerateOutput::failure(vec![JsonError::new("CLI_010", "boom")], vec![]);
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["success"], serde_json::json!(false));
        assert!(value.get("result").is_none());
        assert_eq!(value["errors"][0]["code"], serde_json::json!("CLI_010"));
        assert!(value["errors"][0].get("path").is_none());
    }
}
