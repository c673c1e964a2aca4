use super::terms::{DEFAULT_DATE_HINTS, DateFieldMatcher};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "fieldq";
const CONFIG_FILE: &str = "config.json";

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "FIELDQ_CONFIG";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Field that takes the reserved date range clause
    #[serde(default = "default_date_field")]
    pub date_field: String,

    /// Fields of the current collection, in display order
    #[serde(default)]
    pub known_fields: Vec<String>,

    /// Name fragments marking a field as a date field (case-insensitive)
    #[serde(default = "default_date_field_hints")]
    pub date_field_hints: Vec<String>,

    /// Extra fields always treated as date fields
    #[serde(default)]
    pub reserved_date_fields: Vec<String>,
}

fn default_date_field() -> String {
    "date".to_string()
}

fn default_date_field_hints() -> Vec<String> {
    DEFAULT_DATE_HINTS.iter().map(|s| s.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            date_field: default_date_field(),
            known_fields: Vec::new(),
            date_field_hints: default_date_field_hints(),
            reserved_date_fields: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load config from `$FIELDQ_CONFIG` or the app data directory, or
    /// return defaults if there is no config file
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Date field predicate for term extraction. The reserved range field
    /// always counts as a date field.
    pub fn date_matcher(&self) -> DateFieldMatcher {
        let reserved = self
            .reserved_date_fields
            .iter()
            .cloned()
            .chain(std::iter::once(self.date_field.clone()));
        DateFieldMatcher::new(&self.date_field_hints, reserved)
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    Ok(base.join(APP_NAME))
}
