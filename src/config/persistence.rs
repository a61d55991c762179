//! Config persistence — YAML load/save/reset for the battle configuration.

use std::path::{Path, PathBuf};

use super::{BattleConfig, ConfigError};

/// Default path for the battle config.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".symphony-skirmish");
    path.push("battle.yaml");
    path
}

/// Load and validate a config. Returns the defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<BattleConfig, ConfigError> {
    if !path.exists() {
        return Ok(BattleConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: BattleConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save a config to YAML, creating parent directories as needed.
pub fn save_config(path: &Path, config: &BattleConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Remove the config file and return the defaults.
pub fn reset_config(path: &Path) -> Result<BattleConfig, ConfigError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(BattleConfig::default())
}
