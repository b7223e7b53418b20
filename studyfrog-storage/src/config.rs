//! Storage configuration: where the per-type table files live.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::Storage`] instance, loadable from a
/// `config.toml` file alongside the table files (see §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory containing the per-type table files.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data") }
    }
}

impl StorageConfig {
    /// Loads configuration from a TOML file, falling back to defaults
    /// for any field the file omits and to an all-default config if the
    /// file does not exist.
    pub fn load(path: impl AsRef<std::path::Path>) -> studyfrog_model::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|err| studyfrog_model::Error::StorageIo(format!("invalid config.toml: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_falls_back_to_default_when_file_is_missing() {
        let config = StorageConfig::load("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config, StorageConfig::default());
    }

    #[test]
    fn load_reads_data_dir_from_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/custom/data\"\n").unwrap();

        let config = StorageConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml = = =").unwrap();

        assert!(StorageConfig::load(&path).is_err());
    }
}
