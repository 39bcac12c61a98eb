mod config;

pub use config::{CascadeSettings, CascadeStrategy, Config, DisplaySettings};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/correlativas[-dev]/` based on CORRELATIVAS_ENV.
///
/// Set CORRELATIVAS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CORRELATIVAS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("correlativas-dev")
    } else {
        base_dir.join("correlativas")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
