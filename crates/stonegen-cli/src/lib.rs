//! Stonegen CLI library.
//!
//! Argument definitions, parameter loading, logging setup and the
//! `generate`, `preview`, `validate` and `params` commands.

pub mod cli_args;
pub mod commands;
pub mod input;
pub mod logging;
