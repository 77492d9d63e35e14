use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::config::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE},
    result::{AppError, Result},
};

/// Settings persisted between runs; the token is never stored here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: CompactString,
    pub per_page: u32,
    pub log_level: Option<CompactString>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            per_page: DEFAULT_PER_PAGE,
            log_level: None,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("octolens.toml")
    } else {
        PathBuf::from("octolens.toml")
    }
}

/// Load the config file, falling back to defaults when it does not exist yet
pub fn load_config(config_file: &Path) -> Result<AppConfig> {
    if !config_file.exists() {
        return Ok(AppConfig::default());
    }

    confy::load_path(config_file)
        .map_err(|e| AppError::config_load_error(config_file.to_path_buf(), e))
}

pub fn save_config(config_file: &Path, config: &AppConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| AppError::config_save_error(config_file.to_path_buf(), e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir()
            .join(format!("octolens-test-{}-{nanos}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = scratch_path("absent.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn saved_config_loads_back() {
        let path = scratch_path("octolens.toml");
        let config = AppConfig {
            base_url: "https://ghe.example.com/api/v3".into(),
            per_page: 50,
            log_level: Some("debug".into()),
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
