// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Expand a leading `~/` to the home directory.
pub fn expand_home(raw_path: &str) -> Result<PathBuf, ConfigError> {
    match raw_path.trim().strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| ConfigError::FileError {
                message: "Could not determine home directory for ~ expansion".into(),
                path: raw_path.to_string(),
                hint: Some("Set HOME or use an absolute path".into()),
                code: Some(300),
            })?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw_path.trim())),
    }
}

/// Read a whole file after `~/` expansion.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String, ConfigError> {
    let raw = path.as_ref().to_string_lossy().to_string();
    let resolved = expand_home(&raw)?;
    fs::read_to_string(&resolved).map_err(|e| ConfigError::FileError {
        message: format!("Failed to read file: {}", e),
        path: resolved.to_string_lossy().to_string(),
        hint: Some("Check that the file exists and is readable".into()),
        code: Some(301),
    })
}
