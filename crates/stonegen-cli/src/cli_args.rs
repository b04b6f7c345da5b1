//! CLI argument definitions for the `stonegen` command-line interface.
//!
//! All `#[derive(Parser)]`, `#[derive(Subcommand)]` and `#[derive(Args)]`
//! types are defined here, keeping `main.rs` focused on dispatch logic.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Stonegen - Procedural PBR stone material generator
#[derive(Parser, Debug)]
#[command(name = "stonegen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the four material maps and write them as PNG files
    Generate {
        #[command(flatten)]
        params: ParamsArgs,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// File name prefix
        #[arg(long, default_value = "Stone")]
        prefix: String,

        /// Allow resolutions above 8192 pixels per side
        #[arg(short, long)]
        yes: bool,

        /// Encode with maximum PNG compression (slower)
        #[arg(long)]
        best_compression: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Generate at preview resolution and write an albedo/normal composite
    Preview {
        #[command(flatten)]
        params: ParamsArgs,

        /// Output PNG path
        #[arg(short, long, default_value = "stone_preview.png")]
        output: PathBuf,

        /// Longest side of the preview image in pixels
        #[arg(long, default_value_t = 512)]
        max_size: u32,
    },

    /// Validate a parameter file without generating anything
    Validate {
        /// Path to the JSON parameter file
        #[arg(short, long)]
        params: PathBuf,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the effective parameters as JSON
    Params {
        #[command(flatten)]
        params: ParamsArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parameter sources shared by every generating command.
///
/// Precedence, lowest first: built-in defaults, `--params` file, flags.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ParamsArgs {
    /// JSON parameter file; individual flags override its values
    #[arg(short, long = "params", value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// Square resolution (presets: 1024, 2048, 4096, 8192, 16384)
    #[arg(short, long, value_name = "PIXELS")]
    pub resolution: Option<u32>,

    /// Width in pixels (overrides --resolution)
    #[arg(long)]
    pub width: Option<u32>,

    /// Height in pixels (overrides --resolution)
    #[arg(long)]
    pub height: Option<u32>,

    /// Seed, 0..=4294967295 (default: current UNIX time)
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Noise scale; larger values give finer detail
    #[arg(long)]
    pub scale: Option<f64>,

    /// Noise octaves, 1-8
    #[arg(long)]
    pub octaves: Option<u8>,

    /// Contrast around mid gray
    #[arg(long)]
    pub contrast: Option<f64>,

    /// Normal map relief strength
    #[arg(long)]
    pub depth: Option<f64>,

    /// Roughness contrast around mid gray
    #[arg(long)]
    pub roughness: Option<f64>,

    /// Recess color as hex, e.g. #2b2b2b
    #[arg(long)]
    pub color1: Option<String>,

    /// Peak color as hex, e.g. #8a8a8a
    #[arg(long)]
    pub color2: Option<String>,
}
