//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Cascade strategy and pass limits
//! - Display options for plan listings
//!
//! Configuration is stored at `~/.config/correlativas/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::cascade::{CascadeConfig, PassLimit, DEFAULT_MAX_PASSES, LEGACY_FIXED_PASSES};
use crate::error::ConfigError;

/// How the cascade decides its pass budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeStrategy {
    /// Iterate until nothing changes, bounded by plan depth.
    Adaptive,
    /// Run at most `fixed_passes` passes.
    Fixed,
}

/// Cascade engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeSettings {
    #[serde(default = "default_strategy")]
    pub strategy: CascadeStrategy,
    #[serde(default = "default_fixed_passes")]
    pub fixed_passes: usize,
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
}

/// Plan listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_true")]
    pub group_by_level: bool,
    #[serde(default = "default_true")]
    pub show_sequence_numbers: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/correlativas/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cascade: CascadeSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

fn default_strategy() -> CascadeStrategy {
    CascadeStrategy::Adaptive
}
fn default_fixed_passes() -> usize {
    LEGACY_FIXED_PASSES
}
fn default_max_passes() -> usize {
    DEFAULT_MAX_PASSES
}
fn default_true() -> bool {
    true
}

impl Default for CascadeSettings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            fixed_passes: default_fixed_passes(),
            max_passes: default_max_passes(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            group_by_level: true,
            show_sequence_numbers: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the defaults cannot
    /// be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Engine configuration derived from the `cascade` section.
    pub fn cascade_config(&self) -> CascadeConfig {
        let base = CascadeConfig::new().with_max_passes(self.cascade.max_passes);
        match self.cascade.strategy {
            CascadeStrategy::Adaptive => CascadeConfig {
                pass_limit: PassLimit::Adaptive,
                ..base
            },
            CascadeStrategy::Fixed => base.with_fixed_passes(self.cascade.fixed_passes),
        }
    }
}
