//! Campaign generation configuration.
//!
//! Every field defaults to the stock campaign, so a JSON file only needs to
//! name what it changes:
//!
//! ```json
//! { "seed": 7, "room_attempts": 20, "hull_override": "oval" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{campaign, output, rooms};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Campaign seed. The graph and every deck derive their RNG streams from it.
    pub seed: u64,
    pub depth_count: u32,
    pub side_lane_chance: f64,
    pub room_attempts: u32,
    pub pool_chance: f64,
    pub furniture_chance: f64,
    /// Ambient music reference written into every level's settings.
    pub music: String,
    /// Force one hull style on every deck. Unknown names fall back to tube.
    pub hull_override: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            depth_count: campaign::DEPTH_COUNT,
            side_lane_chance: campaign::SIDE_LANE_CHANCE,
            room_attempts: rooms::ATTEMPTS,
            pool_chance: rooms::POOL_CHANCE,
            furniture_chance: rooms::FURNITURE_CHANCE,
            music: output::DEFAULT_MUSIC.to_string(),
            hull_override: None,
        }
    }
}

impl GenerationConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the generators cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_count == 0 {
            return Err(ConfigError::Invalid("depth_count must be at least 1".into()));
        }
        for (name, value) in [
            ("side_lane_chance", self.side_lane_chance),
            ("pool_chance", self.pool_chance),
            ("furniture_chance", self.furniture_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration or catalog data
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}
