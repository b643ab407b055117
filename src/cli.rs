//! Command line interface definition

use std::path::PathBuf;

use clap::Parser;

/// A fast, keyboard-driven terminal manager for BibTeX paper libraries.
#[derive(Debug, Parser)]
#[command(name = "bibr", version, about)]
pub struct Cli {
    /// Initial search query applied to the list at startup
    /// (e.g. `bibr --tag ml year=202`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Library folder to open instead of the configured one
    #[arg(long, value_name = "DIR")]
    pub library: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
