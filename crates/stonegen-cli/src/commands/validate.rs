//! Validate command implementation
//!
//! Checks a JSON parameter file without generating anything.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use stonegen_spec::validate_params;

use super::json_output::{
    input_error_to_json, validation_error_to_json, validation_warning_to_json, ValidateOutput,
};
use super::{print_input_error, print_params_summary, print_warnings, EXIT_INVALID_INPUT};
use crate::input::{read_params_file, InputError};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(path: &Path, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(path)
    } else {
        run_human(path)
    }
}

fn run_human(path: &Path) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), path.display());

    let params = match read_params_file(path) {
        Ok(params) => params,
        Err(e) => {
            print_input_error(&e);
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };
    print_params_summary(&params);

    let result = validate_params(&params);
    print_warnings(&result.warnings);

    if !result.is_ok() {
        print_input_error(&InputError::Invalid(result.errors));
        return Ok(ExitCode::from(EXIT_INVALID_INPUT));
    }

    let hash = params
        .canonical_hash()
        .context("Failed to hash parameters")?;
    println!(
        "\n{} Parameters are valid {}",
        "SUCCESS".green().bold(),
        format!("({})", &hash[..16]).dimmed()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(path: &Path) -> Result<ExitCode> {
    let (output, code) = match read_params_file(path) {
        Err(e) => (
            ValidateOutput {
                success: false,
                errors: input_error_to_json(&e),
                warnings: Vec::new(),
                params: None,
                params_hash: None,
            },
            ExitCode::from(EXIT_INVALID_INPUT),
        ),
        Ok(params) => {
            let result = validate_params(&params);
            let success = result.is_ok();
            let params_hash = params.canonical_hash().ok();
            (
                ValidateOutput {
                    success,
                    errors: result.errors.iter().map(validation_error_to_json).collect(),
                    warnings: result.warnings.iter().map(validation_warning_to_json).collect(),
                    params: Some(params),
                    params_hash,
                },
                if success {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(EXIT_INVALID_INPUT)
                },
            )
        }
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(code)
}
