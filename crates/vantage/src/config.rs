use std::{env, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DEFAULT_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    ReadFailed,
    #[error("failed to write config file")]
    WriteFailed,
    #[error("failed to parse config file")]
    ParseFailed,
    #[error("no usable config path (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Provider,
    pub cache: Cache,
}

/// Measurement provider endpoints and request identity.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Cache {
    /// Path of the node catalog cache file.
    pub path: path::PathBuf,
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: concat!("vantage/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self { path: "nodes_cache.json".into() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { provider: Provider::default(), cache: Cache::default() }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/vantage/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("vantage/config.toml"))
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/vantage/config.toml
    /// or the specified path, with the name config.toml if one does not exist
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string =
                fs::read_to_string(&config_path).map_err(|_err| ConfigError::ReadFailed)?;
            toml::from_str(raw_string.as_str()).map_err(|_err| ConfigError::ParseFailed)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String =
            toml::to_string_pretty(self).map_err(|_err| ConfigError::ParseFailed)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|_err| ConfigError::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(|_err| ConfigError::WriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_provider() {
        let config = Config::default();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert!(config.provider.user_agent.starts_with("vantage/"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [provider]
            base_url = "https://probe.internal"
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.base_url, "https://probe.internal");
        assert_eq!(config.cache.path, path::PathBuf::from("nodes_cache.json"));
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::from_config(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);

        // Re-reading yields the same values.
        let reread = Config::from_config(Some(&path)).unwrap();
        assert_eq!(reread.provider.base_url, config.provider.base_url);
    }
}
