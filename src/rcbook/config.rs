use crate::error::{RcbookError, Result};
use crate::store::DEFAULT_RECORDS_KEY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Keys accepted by `get`/`set`/`unset`.
pub const CONFIG_KEYS: &[&str] = &["background-image", "output-dir", "storage-key"];

/// Configuration for rcbook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RcbookConfig {
    /// Certificate template drawn under the field text (PNG or JPEG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,

    /// Where certificates and archives are written; the working directory if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Storage key holding the record set
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_RECORDS_KEY.to_string()
}

impl Default for RcbookConfig {
    fn default() -> Self {
        Self {
            background_image: None,
            output_dir: None,
            storage_key: default_storage_key(),
        }
    }
}

impl RcbookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(RcbookError::Io)?;
        let config: RcbookConfig =
            serde_json::from_str(&content).map_err(RcbookError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(RcbookError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(RcbookError::Serialization)?;
        fs::write(config_path, content).map_err(RcbookError::Io)?;
        Ok(())
    }

    /// Output directory, defaulting to the current directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Value for a config key; `None` for unknown keys.
    /// Unset optional values read as an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        match key {
            "background-image" => Some(show(&self.background_image)),
            "output-dir" => Some(show(&self.output_dir)),
            "storage-key" => Some(self.storage_key.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("Value for {} cannot be empty", key));
        }
        match key {
            "background-image" => self.background_image = Some(PathBuf::from(value)),
            "output-dir" => self.output_dir = Some(PathBuf::from(value)),
            "storage-key" => {
                if !value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                {
                    return Err(format!("Invalid storage key: {}", value));
                }
                self.storage_key = value.to_string();
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// Resets a key to its default.
    pub fn unset(&mut self, key: &str) -> std::result::Result<(), String> {
        match key {
            "background-image" => self.background_image = None,
            "output-dir" => self.output_dir = None,
            "storage-key" => self.storage_key = default_storage_key(),
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RcbookConfig::default();
        assert_eq!(config.storage_key, "vehicles");
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert_eq!(config.get("background-image"), Some(String::new()));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = RcbookConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config, RcbookConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = RcbookConfig::default();
        config.set("output-dir", "/tmp/certs").unwrap();
        config.set("background-image", "template.png").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = RcbookConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.output_dir(), PathBuf::from("/tmp/certs"));
        assert_eq!(loaded.get("background-image").as_deref(), Some("template.png"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RcbookConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RcbookConfig::default());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = RcbookConfig::default();
        assert!(config.set("colour", "red").is_err());
        assert!(config.set("output-dir", "  ").is_err());
        assert!(config.set("storage-key", "../etc").is_err());
        assert_eq!(config, RcbookConfig::default());
    }

    #[test]
    fn test_unset_restores_default() {
        let mut config = RcbookConfig::default();
        config.set("storage-key", "fleet").unwrap();
        config.unset("storage-key").unwrap();
        assert_eq!(config.storage_key, "vehicles");
        assert!(config.unset("colour").is_err());
    }
}
