use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the mediavault application.
///
/// Loaded from `~/.mediavault/config.toml` by default. Each section is
/// individually defaulted so a partial file is still valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

impl VaultConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VaultConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Full path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        Path::new(&self.general.data_dir).join(&self.storage.db_file)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory holding the SQLite file.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.mediavault/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file name inside the data directory.
    pub db_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: "media.db".to_string(),
        }
    }
}

/// Command router settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Number of records returned by `list_files`.
    pub page_size: usize,
    /// Maximum number of search hits returned per query.
    pub search_limit: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            search_limit: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.storage.db_file, "media.db");
        assert_eq!(config.bot.page_size, 10);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_db_path_joins_sections() {
        let mut config = VaultConfig::default();
        config.general.data_dir = "/tmp/vault".to_string();
        assert_eq!(config.db_path(), PathBuf::from("/tmp/vault/media.db"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = VaultConfig::default();
        config.bot.page_size = 25;
        config.general.log_level = "debug".to_string();
        config.save(&path).unwrap();

        let loaded = VaultConfig::load(&path).unwrap();
        assert_eq!(loaded.bot.page_size, 25);
        assert_eq!(loaded.general.log_level, "debug");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(VaultConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = VaultConfig::load_or_default(&path);
        assert_eq!(config.storage.db_file, "media.db");
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bot]\npage_size = 3\n").unwrap();

        let config = VaultConfig::load(&path).unwrap();
        assert_eq!(config.bot.page_size, 3);
        assert_eq!(config.bot.search_limit, 50);
        assert_eq!(config.general.log_level, "info");
    }
}
