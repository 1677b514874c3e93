//! Configuration loading from `.lbhrc.toml`.
//!
//! Configuration is optional - lbh uses defaults that match the usual
//! repository layout (`data/` and `json/campaign_levels.json`) if no config
//! file exists. Command-line flags override everything here.
//!
//! # Example Configuration
//!
//! ```toml
//! [store]
//! data_dir = "data"
//! level_index = "json/campaign_levels.json"
//!
//! [migrate]
//! timezone = "local"
//!
//! [output]
//! format = "table"
//! color = true
//!
//! [plot]
//! width = 1280
//! height = 720
//! ```

use lbh_core::Zone;
use serde::Deserialize;
use std::path::Path;

/// Config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".lbhrc.toml";

/// Default directory holding canonical records and legacy files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default path of the level index.
pub const DEFAULT_LEVEL_INDEX: &str = "json/campaign_levels.json";

pub const DEFAULT_PLOT_WIDTH: u32 = 1280;
pub const DEFAULT_PLOT_HEIGHT: u32 = 720;

/// Root configuration structure loaded from `.lbhrc.toml`.
///
/// All sections are optional and will use defaults if not specified.
#[derive(Debug, Deserialize, Default)]
pub struct LbhConfig {
    /// Where the JSON store lives.
    #[serde(default)]
    pub store: StoreConfig,

    /// Migration settings.
    #[serde(default)]
    pub migrate: MigrateConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,

    /// Chart size.
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Store locations, relative to the working directory.
#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub data_dir: Option<String>,

    #[serde(default)]
    pub level_index: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MigrateConfig {
    /// Zone legacy times are read in: `local` (default) or `utc`.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Output formatting preferences.
///
/// Command-line flags (e.g., `--format json`) override these settings.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `table`, `json`, `csv`
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Auto-detected when unset.
    #[serde(default)]
    pub color: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlotConfig {
    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,
}

impl LbhConfig {
    /// Load configuration from `.lbhrc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn data_dir(&self) -> &str {
        self.store.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    pub fn level_index(&self) -> &str {
        self.store
            .level_index
            .as_deref()
            .unwrap_or(DEFAULT_LEVEL_INDEX)
    }

    /// Configured zone for legacy times. Unknown values fall back to local
    /// with a warning.
    pub fn timezone(&self) -> Zone {
        match self.migrate.timezone.as_deref() {
            None => Zone::default(),
            Some(name) => name.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; using local time", e);
                Zone::default()
            }),
        }
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    pub fn plot_size(&self) -> (u32, u32) {
        (
            self.plot.width.unwrap_or(DEFAULT_PLOT_WIDTH),
            self.plot.height.unwrap_or(DEFAULT_PLOT_HEIGHT),
        )
    }
}
