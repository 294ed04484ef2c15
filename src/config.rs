//! Simulation configuration.
//!
//! T010: Implement SimConfig loading from TOML
//! T011: Define classifier and scoring settings with defaults

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

/// Top-level simulation configuration.
///
/// All constants are read at construction time; there is no hot reload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Road classifier settings
    pub classifier: ClassifierSettings,
    /// Score engine settings
    pub scoring: ScoringSettings,
}

/// Road classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Base URL of the nearest-road snapping API
    pub base_url: String,
    /// API credential; absent means fallback-only operation
    pub api_key: Option<String>,
    /// Remote query timeout in seconds
    pub request_timeout_secs: u64,
    /// Classification cache time-to-live in seconds
    pub cache_ttl_secs: u64,
    /// Maximum number of cached classifications
    pub cache_capacity: usize,
    /// Snap distance threshold in meters
    pub road_tolerance_m: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            base_url: "https://roads.googleapis.com/v1/nearestRoads".to_string(),
            api_key: None,
            request_timeout_secs: 5,
            cache_ttl_secs: 30,
            cache_capacity: 4096,
            road_tolerance_m: 10.0,
        }
    }
}

/// Score engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Points earned per on-road meter before bonuses
    pub points_per_meter: f64,
    /// Cap on the linear speed bonus
    pub speed_bonus_cap: f64,
    /// Multiplier ceiling
    pub max_multiplier: f64,
    /// Seconds of uninterrupted on-road driving per multiplier step
    pub multiplier_ramp_secs: f64,
    /// Points lost per off-road meter
    pub off_road_penalty_per_meter: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            points_per_meter: 5.0,
            speed_bonus_cap: 1.5,
            max_multiplier: 3.0,
            multiplier_ramp_secs: 8.0,
            off_road_penalty_per_meter: 5.0,
        }
    }
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Get the platform configuration directory.
fn get_config_dir() -> PathBuf {
    ProjectDirs::from("com", "providence-it", "rustdrive")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load configuration from the given path.
///
/// A missing file is not an error: defaults are returned so a fresh
/// install runs without any setup.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("no config file at {}, using defaults", path.display());
        return Ok(SimConfig::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to the given path, creating parent directories.
pub fn save_config(config: &SimConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::WriteError(e.to_string()))
}
