//! Params command implementation
//!
//! Prints the effective parameters (defaults, file, flags) as JSON.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

use super::{print_input_error, EXIT_INVALID_INPUT};
use crate::cli_args::ParamsArgs;
use crate::input::{resolve_params, time_seed};

/// Run the params command
///
/// The output is not range-checked; feed it to `validate` for that.
pub fn run(params: &ParamsArgs, output: Option<&Path>) -> Result<ExitCode> {
    let params = match resolve_params(params, time_seed) {
        Ok(params) => params,
        Err(e) => {
            print_input_error(&e);
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };

    let json = params
        .to_json_pretty()
        .context("Failed to serialize parameters")?;

    match output {
        Some(path) => std::fs::write(path, format!("{}\n", json))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}
