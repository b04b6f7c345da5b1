//! Preview command implementation
//!
//! Generates a material at preview resolution and writes one composite
//! image: the albedo with the normal map blended over it.

use anyhow::{Context, Result};
use colored::Colorize;
use image::{imageops, RgbImage};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use stonegen_texture::{generate_maps, MaterialMapSet, RgbRaster};

use super::{
    high_memory_refusal, print_input_error, print_params_summary, print_warnings,
    EXIT_GENERATION_FAILED, EXIT_INVALID_INPUT,
};
use crate::cli_args::ParamsArgs;
use crate::input::{load_params, time_seed, LoadedParams};

/// Side length used when no resolution is given on the command line.
pub const PREVIEW_RESOLUTION: u32 = 1024;

/// Weight of the normal map in the composite.
pub const NORMAL_BLEND: f32 = 0.2;

/// Run the preview command
///
/// # Returns
/// Exit code: 0 success, 1 invalid input, 2 generation error
pub fn run(params: &ParamsArgs, output: &Path, max_size: u32) -> Result<ExitCode> {
    let start = Instant::now();

    let mut args = params.clone();
    if args.resolution.is_none() && args.width.is_none() && args.height.is_none() {
        args.resolution = Some(PREVIEW_RESOLUTION);
    }

    let LoadedParams { params, warnings } = match load_params(&args, time_seed) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_input_error(&e);
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };
    println!("{} {}", "Preview:".cyan().bold(), output.display());
    print_params_summary(&params);
    print_warnings(&warnings);

    if let Some(message) = high_memory_refusal(&params, false) {
        println!("\n{} {}", "REFUSED".red().bold(), message);
        return Ok(ExitCode::from(EXIT_INVALID_INPUT));
    }

    let mut printer = |percent: u8, label: &str| {
        println!("  {} {}", format!("[{:>3}%]", percent).cyan(), label);
    };
    let maps = match generate_maps(&params, &mut printer) {
        Ok(maps) => maps,
        Err(e) => {
            println!("\n{} {}", "FAILED".red().bold(), e);
            return Ok(ExitCode::from(EXIT_GENERATION_FAILED));
        }
    };

    let composite = compose_preview(&maps, max_size)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    composite
        .save(output)
        .with_context(|| format!("Failed to write preview: {}", output.display()))?;

    println!(
        "\n{} Wrote {}x{} preview to {} ({}ms)",
        "SUCCESS".green().bold(),
        composite.width(),
        composite.height(),
        output.display(),
        start.elapsed().as_millis()
    );
    Ok(ExitCode::SUCCESS)
}

/// Largest size with the same aspect ratio that fits in `max_size`. Never upscales.
pub fn fit_within(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_size || max_size == 0 {
        return (width, height);
    }
    let scale = max_size as f64 / longest as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).max(1);
    (fit(width), fit(height))
}

/// Thumbnail albedo and normal to fit `max_size`, then blend
/// `albedo * (1 - NORMAL_BLEND) + normal * NORMAL_BLEND`.
pub fn compose_preview(maps: &MaterialMapSet, max_size: u32) -> Result<RgbImage> {
    let (w, h) = fit_within(maps.width(), maps.height(), max_size);
    let albedo = imageops::thumbnail(&to_image(&maps.albedo)?, w, h);
    let normal = imageops::thumbnail(&to_image(&maps.normal)?, w, h);

    let mut out = albedo;
    for (dst, src) in out.pixels_mut().zip(normal.pixels()) {
        for c in 0..3 {
            let blended = dst[c] as f32 * (1.0 - NORMAL_BLEND) + src[c] as f32 * NORMAL_BLEND;
            dst[c] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

fn to_image(raster: &RgbRaster) -> Result<RgbImage> {
    RgbImage::from_raw(raster.width, raster.height, raster.data.clone())
        .context("raster size does not match its dimensions")
}
