//! CLI command implementations

pub mod generate;
pub mod json_output;
pub mod params;
pub mod preview;
pub mod validate;

use colored::Colorize;
use stonegen_spec::{GenerationParams, ValidationWarning, HIGH_MEMORY_RESOLUTION};
use stonegen_texture::estimate_peak_bytes;

use crate::input::InputError;

/// Exit code for invalid input.
pub const EXIT_INVALID_INPUT: u8 = 1;
/// Exit code for a failed generation or export.
pub const EXIT_GENERATION_FAILED: u8 = 2;

/// Refusal message when a side exceeds the high-memory threshold and
/// the user has not confirmed.
pub(crate) fn high_memory_refusal(params: &GenerationParams, confirmed: bool) -> Option<String> {
    let side = params.width.max(params.height);
    if confirmed || side <= HIGH_MEMORY_RESOLUTION {
        return None;
    }
    let gib = estimate_peak_bytes(params.width, params.height) as f64 / (1u64 << 30) as f64;
    Some(format!(
        "{}x{} needs about {:.1} GiB of working memory; pass --yes to continue",
        params.width, params.height, gib
    ))
}

/// Current UNIX time in seconds, used for export file names.
pub(crate) fn unix_timestamp() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

pub(crate) fn print_input_error(err: &InputError) {
    match err {
        InputError::Invalid(errors) => {
            println!("{}", "Invalid parameters:".red().bold());
            for e in errors {
                println!("  {} {}", e.code.to_string().red(), format_field(e.path.as_deref(), &e.message));
            }
        }
        other => println!("{} {}", "ERROR".red().bold(), other),
    }
}

pub(crate) fn print_warnings(warnings: &[ValidationWarning]) {
    for w in warnings {
        println!(
            "  {} {} {}",
            "!".yellow(),
            w.code.to_string().yellow(),
            format_field(w.path.as_deref(), &w.message)
        );
    }
}

pub(crate) fn print_params_summary(params: &GenerationParams) {
    println!(
        "{} {}x{}, seed {}, scale {}, octaves {}",
        "Parameters:".cyan().bold(),
        params.width,
        params.height,
        params.seed,
        params.scale,
        params.octaves
    );
    println!(
        "{} contrast {}, depth {}, roughness {}, colors {} -> {}",
        "           ".dimmed(),
        params.contrast,
        params.depth_strength,
        params.roughness_factor,
        params.color1,
        params.color2
    );
}

fn format_field(path: Option<&str>, message: &str) -> String {
    match path {
        Some(path) => format!("{}: {}", path.dimmed(), message),
        None => message.to_string(),
    }
}
