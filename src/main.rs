//! bibr application entry point
//!
//! Loads configuration, sets up file logging, opens the paper library, and
//! hands the terminal to the application shell. The shell restores the
//! terminal before any failure reaches the error report below.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use bibr::BibrError;
use bibr::app::App;
use bibr::cli::Cli;
use bibr::config::BibrConfig;
use bibr::logging;
use bibr::store::Library;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bibr: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), BibrError> {
    let mut cfg = match &cli.config {
        Some(path) => BibrConfig::load_from(path)?,
        None => BibrConfig::load()?,
    };
    if let Some(library) = cli.library {
        cfg.path = library;
    }

    let _log_guard = logging::init(&cfg.path, &cfg.log_filter)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let library = Library::open(&cfg.path, cfg.title_include, cfg.viewer.clone())?;
    let mut app = App::new(&cfg, library)?;
    if !cli.query.is_empty() {
        app.apply_search(&cli.query.join(" "))?;
    }
    app.run()
}
