//! 8-bit RGB colors and hex parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{ErrorCode, ValidationError};

/// Regex pattern for `#rrggbb` / `rrggbb` color strings.
const HEX_COLOR_PATTERN: &str = r"^#?[0-9a-fA-F]{6}$";

static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn hex_color_regex() -> &'static Regex {
    HEX_COLOR_REGEX.get_or_init(|| Regex::new(HEX_COLOR_PATTERN).expect("invalid regex pattern"))
}

/// An 8-bit RGB color.
///
/// Serializes as a `"#rrggbb"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb` (case-insensitive).
    ///
    /// # Example
    /// ```
    /// use stonegen_spec::Rgb8;
    ///
    /// assert_eq!(Rgb8::from_hex("#2b2b2b").unwrap(), Rgb8::new(43, 43, 43));
    /// assert!(Rgb8::from_hex("#2b2b").is_err());
    /// ```
    pub fn from_hex(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if !hex_color_regex().is_match(trimmed) {
            return Err(ValidationError::new(
                ErrorCode::InvalidColor,
                format!("expected a hex color like #8a8a8a, got '{}'", text),
            ));
        }

        let digits = trimmed.trim_start_matches('#');
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| {
                ValidationError::new(
                    ErrorCode::InvalidColor,
                    format!("invalid hex channel in '{}': {}", text, e),
                )
            })
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as `[r, g, b]`.
    #[inline]
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(color: Rgb8) -> Self {
        color.to_hex()
    }
}
