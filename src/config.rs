//! Engine configuration.
//!
//! Loaded once at startup from `imagist.toml` and treated as immutable after
//! that: the dispatcher and engine capture what they need at construction, and
//! nothing reads process-wide state.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! environment = "development"   # development | production
//!
//! [assets]
//! dir = "assets"                # Asset directory (development only)
//! watermark = "watermark.png"   # Base key; per-format key is "<watermark>:<format>"
//! backdrop = "backdrop.png"     # Backdrop key
//!
//! [queue]
//! capacity = 10                 # Admission queue size; a full queue blocks submitters
//!
//! [processing]
//! max_processes = 4             # Max parallel format workers (omit for auto = CPU cores)
//!
//! [dimensions]                  # Variants applied to uploads submitted from the CLI
//! min_width = 400
//! [[dimensions.formats]]
//! name = "thumb"
//! width = 200
//! height = 200
//! ```
//!
//! Config files are sparse: user values are merged over the stock defaults
//! with [`merge_toml`]. Unknown keys are rejected to catch typos early.

use crate::dimensions::ImageDimensions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILENAME: &str = "imagist.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which asset source the engine reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Assets are files under `assets.dir`.
    #[default]
    Development,
    /// Assets are bundled into the host binary.
    Production,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagistConfig {
    pub environment: Environment,
    pub assets: AssetsConfig,
    pub queue: QueueConfig,
    pub processing: ProcessingConfig,
    pub dimensions: ImageDimensions,
}

impl ImagistConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.capacity == 0 {
            return Err(ConfigError::Validation(
                "queue.capacity must be greater than 0".into(),
            ));
        }
        if self.assets.watermark.is_empty() {
            return Err(ConfigError::Validation(
                "assets.watermark must not be empty".into(),
            ));
        }
        if self.assets.backdrop.is_empty() {
            return Err(ConfigError::Validation(
                "assets.backdrop must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Asset keys and the development asset directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub dir: PathBuf,
    pub watermark: String,
    pub backdrop: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            watermark: "watermark.png".to_string(),
            backdrop: "backdrop.png".to_string(),
        }
    }
}

/// Admission queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel format workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ImagistConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse config text, merge it over the stock defaults, and validate.
pub fn parse_config(content: &str) -> Result<ImagistConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: ImagistConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults; a file that exists but fails to
/// parse or validate is an error.
pub fn load_config(path: &Path) -> Result<ImagistConfig, ConfigError> {
    if !path.exists() {
        return Ok(ImagistConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `imagist.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imagist configuration
# =====================
# All options are optional. Values shown are the defaults.

# Where watermark and backdrop images come from:
#   development - files under [assets].dir
#   production  - assets bundled into the host binary
environment = "development"

[assets]
dir = "assets"
# Base key for watermarks. Each format looks up "<watermark>:<format name>",
# e.g. "watermark.png:thumb".
watermark = "watermark.png"
# Backdrop placed behind portrait images on formats with backdrop = true.
# When it cannot be loaded a solid navy canvas is used instead.
backdrop = "backdrop.png"

[queue]
# Pending uploads held before submitters block.
capacity = 10

[processing]
# Parallel format workers. Omit to use every core; larger values are clamped.
# max_processes = 4

[dimensions]
# Uploads smaller than these are rejected when the floor is enforced.
# Omit a key for no limit on that axis.
# min_width = 400
# min_height = 300

# One [[dimensions.formats]] table per variant. Output is written next to
# the upload as "<upload path>:<name>". Sizes never exceed the original.
#
# [[dimensions.formats]]
# name = "thumb"
# width = 200
# height = 200
#
# [[dimensions.formats]]
# name = "cover"
# width = 1200
# height = 630
# backdrop = true
# watermark = { horizontal = "right", vertical = "bottom", offset_x = 16, offset_y = 16 }
"##
}
