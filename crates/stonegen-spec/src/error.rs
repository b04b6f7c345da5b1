//! Error types for parameter parsing and validation.

use thiserror::Error;

/// Error codes for parameter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Width or height is zero or above the supported maximum
    InvalidResolution,
    /// E002: Octave count outside [1, 8]
    OctavesOutOfRange,
    /// E003: Noise scale is not a finite positive number
    InvalidScale,
    /// E004: Contrast is negative or not finite
    InvalidContrast,
    /// E005: Depth strength is negative or not finite
    InvalidDepthStrength,
    /// E006: Roughness factor is negative or not finite
    InvalidRoughnessFactor,
    /// E007: Seed text could not be parsed
    InvalidSeed,
    /// E008: Color text could not be parsed
    InvalidColor,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidResolution => "E001",
            ErrorCode::OctavesOutOfRange => "E002",
            ErrorCode::InvalidScale => "E003",
            ErrorCode::InvalidContrast => "E004",
            ErrorCode::InvalidDepthStrength => "E005",
            ErrorCode::InvalidRoughnessFactor => "E006",
            ErrorCode::InvalidSeed => "E007",
            ErrorCode::InvalidColor => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for parameter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Resolution needs several gigabytes of working memory
    HighMemoryResolution,
    /// W002: Width and height differ
    NonSquareResolution,
    /// W003: Contrast of zero flattens the height field
    ZeroContrast,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::HighMemoryResolution => "W001",
            WarningCode::NonSquareResolution => "W002",
            WarningCode::ZeroContrast => "W003",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Name of the parameter field (e.g., "octaves").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error tied to a field.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Name of the parameter field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning tied to a field.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for parameter handling.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Validation failed with one or more errors.
    #[error("parameter validation failed with {} error(s): {}", .0.len(), join_errors(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result of parameter validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ParamsError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ParamsError::ValidationFailed(self.errors))
        }
    }
}
