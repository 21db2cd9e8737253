use crate::error::{RecitError, Result};
use recit_common::{CountPreferences, DetectionConfig, DetectionOverrides};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overrides the config directory (default: ~/.config/recit)
pub const CONFIG_DIR_ENV: &str = "RECIT_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Detection defaults saved by the user, merged onto the built-in defaults
    pub detection: DetectionOverrides,
    pub count: CountPreferences,
}

impl Config {
    /// Saved settings; an unparsable file is logged and replaced by defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "invalid config ignored, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("config.json"));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| RecitError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("recit").join("config.json"))
    }

    /// Effective detection thresholds: built-in defaults ← saved ← command line
    pub fn detection_config(&self, cli: &DetectionOverrides) -> Result<DetectionConfig> {
        let mut overrides = self.detection;
        overrides.merge(cli);
        Ok(DetectionConfig::default().with_overrides(&overrides)?)
    }

    /// Validate and store new detection defaults
    pub fn set_detection(&mut self, overrides: &DetectionOverrides) -> Result<()> {
        let mut merged = self.detection;
        merged.merge(overrides);
        DetectionConfig::default().with_overrides(&merged)?;
        self.detection = merged;
        self.save()
    }

    pub fn reset(&mut self) -> Result<()> {
        *self = Self::default();
        self.save()
    }
}
