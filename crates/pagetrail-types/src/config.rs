//! Configuration loading for pagetrail.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The config file lives at the platform config dir
//! (e.g. `~/.config/pagetrail/config.toml`).

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PagetrailError;

/// Search engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Window size in days for blank-search pagination
    #[serde(default = "default_days_to_search")]
    pub days_to_search: u32,
}

fn default_days_to_search() -> u32 {
    7
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            days_to_search: default_days_to_search(),
        }
    }
}

impl SearchSettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.days_to_search == 0 {
            return Err("days_to_search must be > 0".to_string());
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagetrailConfig {
    /// Log filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Search settings
    #[serde(default)]
    pub search: SearchSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PagetrailConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            search: SearchSettings::default(),
        }
    }
}

impl PagetrailConfig {
    /// Load configuration from the layered sources.
    ///
    /// `config_path` overrides the default config file location. Env vars
    /// use the `PAGETRAIL_` prefix with `__` separating nesting levels
    /// (e.g. `PAGETRAIL_SEARCH__DAYS_TO_SEARCH=3`).
    pub fn load(config_path: Option<&str>) -> Result<Self, PagetrailError> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                builder = builder.add_source(File::with_name(path));
            }
            None => {
                if let Some(dirs) = ProjectDirs::from("", "", "pagetrail") {
                    let path = dirs.config_dir().join("config.toml");
                    if path.exists() {
                        builder = builder.add_source(File::from(path));
                    }
                }
            }
        }

        builder = builder.add_source(Environment::with_prefix("PAGETRAIL").separator("__"));

        let settings: Self = builder
            .build()
            .map_err(|e| PagetrailError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PagetrailError::Config(e.to_string()))?;

        settings.search.validate().map_err(PagetrailError::Config)?;

        Ok(settings)
    }
}
