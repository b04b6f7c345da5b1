//! Generate command implementation
//!
//! Generates a material set and exports it as four PNG files.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use stonegen_spec::GenerationParams;
use stonegen_texture::{
    generate_maps_with_cancel, save_material_set, submit, CancelToken, ExportManifest,
    GenerateError, MaterialMapSet, NoProgress, PngConfig, TaskEvent,
};

use super::json_output::{
    error_codes, input_error_to_json, manifest_to_json, timings_to_json,
    validation_warning_to_json, GenerateOutput, GenerateResult, JsonError,
};
use super::{
    high_memory_refusal, print_input_error, print_params_summary, print_warnings, unix_timestamp,
    EXIT_GENERATION_FAILED, EXIT_INVALID_INPUT,
};
use crate::cli_args::ParamsArgs;
use crate::input::{load_params, time_seed, LoadedParams};

/// Options for one `generate` invocation.
#[derive(Debug, Clone)]
pub struct GenerateOptions<'a> {
    pub params: &'a ParamsArgs,
    pub out_dir: &'a Path,
    pub prefix: &'a str,
    /// Allow sides above the high-memory threshold.
    pub allow_high_memory: bool,
    pub best_compression: bool,
}

impl GenerateOptions<'_> {
    fn png_config(&self) -> PngConfig {
        if self.best_compression {
            PngConfig::best_compression()
        } else {
            PngConfig::default()
        }
    }
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 1 invalid input, 2 generation error
pub fn run(options: &GenerateOptions<'_>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(options)
    } else {
        run_human(options)
    }
}

/// Run generate with human-readable (colored) output
fn run_human(options: &GenerateOptions<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Output dir:".cyan().bold(), options.out_dir.display());

    let LoadedParams { params, warnings } = match load_params(options.params, time_seed) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_input_error(&e);
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };
    print_params_summary(&params);
    print_warnings(&warnings);

    if let Some(message) = high_memory_refusal(&params, options.allow_high_memory) {
        println!("\n{} {}", "REFUSED".red().bold(), message);
        return Ok(ExitCode::from(EXIT_INVALID_INPUT));
    }
    if options.allow_high_memory && high_memory_refusal(&params, false).is_some() {
        tracing::warn!(width = params.width, height = params.height, "high-memory run confirmed");
    }

    let maps = match generate_with_progress(params.clone()) {
        Ok(maps) => maps,
        Err(e) => {
            println!("\n{} {}", "FAILED".red().bold(), e);
            if e.is_recoverable() {
                println!("{}", "Try a lower resolution or different parameters.".dimmed());
            }
            return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
        }
    };

    let timestamp = unix_timestamp();
    let manifest = match export(&maps, options, timestamp) {
        Ok(manifest) => manifest,
        Err(e) => {
            println!("\n{} {:#}", "EXPORT FAILED".red().bold(), e);
            return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
        }
    };

    println!();
    for file in &manifest.files {
        println!(
            "  {} {:<10} {} {}",
            "+".green(),
            file.kind.file_label(),
            file.path.display(),
            format!("({})", &file.hash[..16]).dimmed()
        );
    }
    println!(
        "\n{} Generated {}x{} material ({}ms)",
        "SUCCESS".green().bold(),
        params.width,
        params.height,
        start.elapsed().as_millis()
    );

    Ok(ExitCode::SUCCESS)
}

/// Run the pipeline on a worker thread, printing progress as it arrives.
fn generate_with_progress(params: GenerationParams) -> Result<MaterialMapSet, GenerateError> {
    let handle = submit(params)?;
    for event in handle.events().iter() {
        match event {
            TaskEvent::Progress { percent, label, .. } => {
                println!("  {} {}", format!("[{:>3}%]", percent).cyan(), label);
            }
            TaskEvent::Completed(maps) => return Ok(maps),
            TaskEvent::Failed(e) => return Err(e),
        }
    }
    handle.wait()
}

fn export(
    maps: &MaterialMapSet,
    options: &GenerateOptions<'_>,
    timestamp: u64,
) -> Result<ExportManifest> {
    save_material_set(
        maps,
        options.out_dir,
        options.prefix,
        timestamp,
        &options.png_config(),
    )
    .with_context(|| format!("Failed to write maps to {}", options.out_dir.display()))
}

/// Run generate with machine-readable JSON output
fn run_json(options: &GenerateOptions<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    let LoadedParams { params, warnings } = match load_params(options.params, time_seed) {
        Ok(loaded) => loaded,
        Err(e) => {
            let output = GenerateOutput::failure(input_error_to_json(&e), Vec::new());
            print_json(&output)?;
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };
    let warnings: Vec<_> = warnings.iter().map(validation_warning_to_json).collect();

    if let Some(message) = high_memory_refusal(&params, options.allow_high_memory) {
        let errors = vec![JsonError::new(error_codes::HIGH_MEMORY, message)];
        print_json(&GenerateOutput::failure(errors, warnings))?;
        return Ok(ExitCode::from(EXIT_INVALID_INPUT));
    }

    let report = match generate_maps_with_cancel(&params, &mut NoProgress, &CancelToken::new()) {
        Ok(report) => report,
        Err(e) => {
            let errors = vec![JsonError::new(error_codes::GENERATION_ERROR, e.to_string())];
            print_json(&GenerateOutput::failure(errors, warnings))?;
            return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
        }
    };

    let timestamp = unix_timestamp();
    let manifest = match export(&report.maps, options, timestamp) {
        Ok(manifest) => manifest,
        Err(e) => {
            let errors = vec![JsonError::new(error_codes::EXPORT_ERROR, format!("{:#}", e))];
            print_json(&GenerateOutput::failure(errors, warnings))?;
            return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
        }
    };

    let params_hash = params
        .canonical_hash()
        .context("Failed to hash parameters")?;
    let output = GenerateOutput {
        success: true,
        errors: Vec::new(),
        warnings,
        result: Some(GenerateResult {
            params,
            params_hash,
            out_dir: options.out_dir.display().to_string(),
            timestamp,
            outputs: manifest_to_json(&manifest),
            stages: timings_to_json(&report.timings),
            duration_ms: start.elapsed().as_millis() as u64,
        }),
    };
    print_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

fn print_json(output: &GenerateOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output)
        .with_context(|| format!("{}: failed to serialize output", error_codes::JSON_SERIALIZE))?;
    println!("{}", json);
    Ok(())
}
