//! Configuration module for bibr
//!
//! Manages application configuration: the library location, viewer command,
//! pane layout, list template, and palette overrides. Configuration is
//! stored in the user's config directory and defaults are written out on
//! first run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BibrConfig {
    /// Root folder of the paper library
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// External PDF viewer command; the platform opener is used when unset
    #[serde(default)]
    pub viewer: Option<String>,

    /// Fraction of the terminal width given to the list pane
    #[serde(default = "default_split_size")]
    pub split_size: f32,

    /// Rows moved by one page-up/page-down press
    #[serde(default = "default_page_key_step")]
    pub page_key_step: usize,

    /// Maximum command-history length; unbounded when unset
    #[serde(default)]
    pub history_max: Option<usize>,

    /// List row template
    #[serde(default = "default_format")]
    pub format: String,

    /// Characters of the title carried into derived entry keys
    #[serde(default)]
    pub title_include: usize,

    /// Palette overrides: semantic name to "fg" or "fg,bg"
    #[serde(default)]
    pub colors: HashMap<String, String>,

    /// Log filter directive for the file log
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_path() -> PathBuf {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from("bibr"), |home| home.join("bibr"))
}

fn default_split_size() -> f32 {
    0.4
}

fn default_page_key_step() -> usize {
    10
}

fn default_format() -> String {
    "{index:<4}[{pdf}] {ID}".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for BibrConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            viewer: None,
            split_size: default_split_size(),
            page_key_step: default_page_key_step(),
            history_max: None,
            format: default_format(),
            title_include: 0,
            colors: HashMap::new(),
            log_filter: default_log_filter(),
        }
    }
}

impl BibrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("bibr").join("config.toml"))
    }

    /// Load configuration from the default location, writing defaults out if
    /// no config file exists yet.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()?;
        settings.try_deserialize()
    }

    /// Save configuration to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;
        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))
    }
}
