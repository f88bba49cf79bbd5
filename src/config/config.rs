use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data::data_exporter::ExportFormat;
use crate::data::data_view::DEFAULT_PAGE_SIZE;
use crate::data::mock_data::DEFAULT_SEED;
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per page
    pub page_size: usize,

    /// Table title; also the export file stem
    pub table_title: String,

    /// Colour the footer and messages
    pub use_color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for exported files (current directory when unset)
    pub output_dir: Option<PathBuf>,

    pub default_format: ExportFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Milliseconds between live updates
    pub interval_ms: u64,

    /// Seed for mock data and live updates
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,

    /// Also append logs to a file in the log directory
    pub log_to_file: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            table_title: "Campaign Performance".to_string(),
            use_color: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_format: ExportFormat::Csv,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            seed: DEFAULT_SEED,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            debug!(target: "config", "No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        debug!(target: "config", "Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write the commented default template to `path`, creating parent directories.
    /// An existing file is only replaced when `force` is set.
    pub fn init_file(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, Self::create_default_with_comments())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(target: "config", "Wrote default config to {:?}", path);
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(AppPaths::config_dir()?.join("config.toml"))
    }

    /// Export directory, defaulting to the current directory
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# campaign-view configuration
# Location: ~/.config/campaign-view/config.toml (Linux)
#           ~/Library/Application Support/campaign-view/config.toml (macOS)
#           %APPDATA%\campaign-view\config.toml (Windows)

[display]
# Rows shown per page
page_size = 10

# Table title, also used for export file names ("Campaign Performance" -> campaign-performance.csv)
table_title = "Campaign Performance"

# Colour the footer and status messages
use_color = true

[export]
# Where exported files are written (leave commented to use the current directory)
# output_dir = "/path/to/exports"

# Format used when --format is not given: "csv" or "pdf"
default_format = "csv"

[feed]
# Milliseconds between live updates in `watch` mode
interval_ms = 5000

# Seed for mock data and live updates; the same seed gives the same rows
seed = 42

[logging]
# Default log filter when RUST_LOG is not set: "error", "warn", "info", "debug", "trace"
level = "info"

# Also append logs to a timestamped file in the log directory
log_to_file = false
"#
        .to_string()
    }
}
