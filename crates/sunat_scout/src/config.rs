//! Configuration for discovery, the HTTP API and cloud sync

use crate::error::{Result, ScoutError};
use crate::scanner::ScanConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration, read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunatConfig {
    /// Directory for per-run process reports (None = `<home>/logs`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Top-level remote folder documents are mirrored into
    #[serde(default = "default_remote_folder")]
    pub remote_folder: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_remote_folder() -> String {
    "SUNAT_Documentos".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_folder: default_remote_folder(),
        }
    }
}

impl SunatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SunatConfig::default();
        assert!(config.log_dir.is_none());
        assert!(!config.scan.follow_symlinks);
        assert!(config.scan.max_nesting_depth.is_none());
        assert_eq!(config.api_addr(), "127.0.0.1:8000");
        assert_eq!(config.sync.remote_folder, "SUNAT_Documentos");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SunatConfig = toml::from_str(
            r#"
            [scan]
            max_nesting_depth = 4

            [api]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.max_nesting_depth, Some(4));
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.sync.remote_folder, "SUNAT_Documentos");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = SunatConfig {
            log_dir: Some(PathBuf::from("/var/log/sunat")),
            scan: ScanConfig {
                follow_symlinks: true,
                max_nesting_depth: Some(2),
            },
            ..SunatConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(SunatConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = SunatConfig::load_or_default(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, SunatConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "scan = 5").unwrap();
        assert!(matches!(
            SunatConfig::load(&path),
            Err(ScoutError::Config(_))
        ));
    }
}
