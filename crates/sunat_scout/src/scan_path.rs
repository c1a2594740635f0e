//! Validation of caller-supplied directories.

use crate::error::{Result, ScoutError};
use std::path::Path;

/// Discovery root: must exist and be a directory.
pub fn validate_root(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ScoutError::InvalidRootKind(path.to_path_buf()));
    }
    Ok(())
}

/// Search path given to the process pipeline: absolute, existing directory.
pub fn validate_search_path(path: &Path) -> Result<()> {
    if !path.is_absolute() {
        return Err(ScoutError::InvalidRootKind(path.to_path_buf()));
    }
    validate_root(path)
}

/// Output directory given to the process pipeline: absolute, existing directory.
pub fn validate_output_dir(path: &Path) -> Result<()> {
    if !path.is_absolute() || !path.is_dir() {
        return Err(ScoutError::InvalidOutputDir(path.to_path_buf()));
    }
    Ok(())
}
