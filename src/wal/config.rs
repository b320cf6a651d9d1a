use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "orders".to_string()
}

/// 64 MiB.
fn default_max_file_size() -> u64 {
    64 * 1024 * 1024
}

fn default_max_files() -> usize {
    8
}

fn default_sync_on_write() -> bool {
    true
}

/// Construction parameters for an [`crate::wal::OrderWal`]. Loadable from
/// TOML via [`crate::config::load`]; every field defaults to the
/// value spec.md §4.3 states, so a bare `WalConfig { directory, ..Default::default() }`
/// matches production behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_sync_on_write")]
    pub sync_on_write: bool,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: default_file_prefix(),
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
            sync_on_write: default_sync_on_write(),
        }
    }
}

impl WalConfig {
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        if self.max_file_size == 0 {
            return Err(crate::errors::ConfigError::Validation(
                "max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.max_files == 0 {
            return Err(crate::errors::ConfigError::Validation(
                "max_files must be greater than zero".to_string(),
            ));
        }
        if self.file_prefix.is_empty() {
            return Err(crate::errors::ConfigError::Validation(
                "file_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
