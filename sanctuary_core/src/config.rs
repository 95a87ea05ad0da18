//! Configuration file support for Sanctuary.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sanctuary/config.toml`.

use crate::progression::LevelingRules;
use crate::{Activity, ActivityEffect, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub leveling: LevelingRules,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<CustomActivity>,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Who is using the display layer; never seen by the engine
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub user: Option<String>,
}

/// Custom or overriding activity definition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomActivity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effect: ActivityEffect,
    pub cooldown_minutes: u64,
}

impl CustomActivity {
    pub fn to_activity(&self) -> Activity {
        Activity {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            effect: self.effect.clone(),
            cooldown_seconds: self.cooldown_minutes.saturating_mul(60),
            last_used: None,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("sanctuary")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("sanctuary").join("config.toml")
    }

    /// Check leveling rules and the resulting activity table
    pub fn validate(&self) -> Result<()> {
        self.leveling.validate()?;

        let errors = crate::catalog::validate_activities(&crate::catalog::build_activities(self));
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
