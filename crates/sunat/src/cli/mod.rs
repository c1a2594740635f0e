//! CLI module for the SUNAT organizer
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `run` entry point.

pub mod config;
pub mod error;
pub mod find;
pub mod organize;
pub mod output;
pub mod process;
pub mod serve;
pub mod sync;

use anyhow::{Context as _, Result};
use error::HelpfulError;
use std::path::{Path, PathBuf};
use sunat_scout::{Scanner, SunatConfig};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: SunatConfig,
    pub config_path: PathBuf,
}

impl AppContext {
    /// Load `path` (or the default location); a missing file means defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(sunat_logging::default_config_path);
        let config = SunatConfig::load_or_default(&config_path)
            .map_err(|e| HelpfulError::invalid_config(&config_path, &e.to_string()))?;
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.config.scan.clone())
    }

    /// Directory for per-run process reports.
    pub fn log_dir(&self) -> PathBuf {
        self.config
            .log_dir
            .clone()
            .unwrap_or_else(sunat_logging::logs_dir)
    }
}

/// Existing directory, made absolute.
pub fn existing_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(HelpfulError::path_not_found(path).into());
    }
    if !path.is_dir() {
        return Err(HelpfulError::not_a_directory(path).into());
    }
    path.canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))
}
