//! Engine settings, read from a JSON file. Every field has a default, so a
//! missing file or a partial one is fine.

use crate::error::ConfigError;
use crate::models::SchedulingPolicy;
use crate::models::review_session::DEFAULT_MAX_ITEMS;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub database_path: PathBuf,
    pub default_max_items: u32,
    pub policy: SchedulingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("shortcut_review.sqlite3"),
            default_max_items: DEFAULT_MAX_ITEMS,
            policy: SchedulingPolicy::default(),
        }
    }
}

/// Loads and validates the config at `path`; defaults if the file is absent.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&contents)?;
    config.policy.validate()?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
