//! Stonegen CLI - Command-line interface for procedural stone materials
//!
//! This binary validates parameters, generates material maps and writes
//! them as PNG files.

use clap::Parser;
use std::process::ExitCode;

use stonegen_cli::cli_args::{Cli, Commands};
use stonegen_cli::commands;
use stonegen_cli::commands::generate::GenerateOptions;
use stonegen_cli::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            params,
            out_dir,
            prefix,
            yes,
            best_compression,
            json,
        } => commands::generate::run(
            &GenerateOptions {
                params: &params,
                out_dir: &out_dir,
                prefix: &prefix,
                allow_high_memory: yes,
                best_compression,
            },
            json,
        ),
        Commands::Preview {
            params,
            output,
            max_size,
        } => commands::preview::run(&params, &output, max_size),
        Commands::Validate { params, json } => commands::validate::run(&params, json),
        Commands::Params { params, output } => commands::params::run(&params, output.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "stonegen",
            "-vv",
            "generate",
            "--resolution",
            "4096",
            "--seed",
            "42",
            "--color1",
            "#112233",
            "--out-dir",
            "maps",
            "--yes",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate {
                params,
                out_dir,
                prefix,
                yes,
                json,
                ..
            } => {
                assert_eq!(params.resolution, Some(4096));
                assert_eq!(params.seed.as_deref(), Some("42"));
                assert_eq!(params.color1.as_deref(), Some("#112233"));
                assert_eq!(out_dir, PathBuf::from("maps"));
                assert_eq!(prefix, "Stone");
                assert!(yes);
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_preview_defaults() {
        let cli = Cli::try_parse_from(["stonegen", "preview"]).unwrap();
        match cli.command {
            Commands::Preview {
                params,
                output,
                max_size,
            } => {
                assert_eq!(params.resolution, None);
                assert_eq!(output, PathBuf::from("stone_preview.png"));
                assert_eq!(max_size, 512);
            }
            _ => panic!("expected preview command"),
        }
    }

    #[test]
    fn test_cli_parses_validate() {
        let cli = Cli::try_parse_from(["stonegen", "validate", "--params", "p.json", "--json"])
            .unwrap();
        match cli.command {
            Commands::Validate { params, json } => {
                assert_eq!(params, PathBuf::from("p.json"));
                assert!(json);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_cli_rejects_non_numeric_octaves() {
        assert!(Cli::try_parse_from(["stonegen", "params", "--octaves", "many"]).is_err());
    }
}
