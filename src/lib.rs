//! bibr - a modal terminal manager for BibTeX paper libraries
//!
//! This library provides the interactive engine (canonical key input, modal
//! panes, query filtering) and the file-based library store behind the
//! `bibr` binary.

use thiserror::Error;

pub mod app;
pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod query;
pub mod record;
pub mod store;
pub mod ui;

pub use record::Record;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum BibrError {
    /// Library store error
    #[error("store error: {0}")]
    Store(#[from] store::StoreError),
    /// Query parse error
    #[error("query error: {0}")]
    Query(#[from] query::QueryError),
    /// UI / terminal error
    #[error("UI error: {0}")]
    Ui(#[from] ui::UiError),
    /// Represents a configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
