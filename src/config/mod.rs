//! Project configuration (eligian.toml)
//!
//! Every key is optional. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::{OperationRegistry, RegistryError};
use crate::validator::ValidationOptions;

/// File name looked up by [`Config::discover`]
pub const CONFIG_FILE: &str = "eligian.toml";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Contents of `eligian.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub registry: RegistryConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,

    /// Directory of the file this was loaded from
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Registry JSON replacing the bundled one, relative to the config file
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    pub max_suggestions: usize,
    pub max_edit_distance: usize,
    pub fallback_operations: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let options = ValidationOptions::default();
        Self {
            max_suggestions: options.max_suggestions,
            max_edit_distance: options.max_edit_distance,
            fallback_operations: options.fallback_operations,
        }
    }
}

impl From<&ValidationConfig> for ValidationOptions {
    fn from(config: &ValidationConfig) -> Self {
        ValidationOptions {
            max_suggestions: config.max_suggestions,
            max_edit_distance: config.max_edit_distance,
            fallback_operations: config.fallback_operations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print compiled JSON
    pub pretty: bool,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.root = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Walk up from `start` looking for `eligian.toml`
    pub fn find(start: &Path) -> Option<PathBuf> {
        let start = if start.is_file() { start.parent()? } else { start };
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Configuration governing `start`, or defaults when none is found
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        match Self::find(start) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        (&self.validation).into()
    }

    /// Registry path resolved against the config file's directory
    pub fn registry_path(&self) -> Option<PathBuf> {
        let path = self.registry.path.as_ref()?;
        Some(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.clone(),
        })
    }

    /// The configured registry, or the bundled one
    pub fn load_registry(&self) -> Result<OperationRegistry, ConfigError> {
        let registry = match self.registry_path() {
            Some(path) => OperationRegistry::from_path(&path)?,
            None => OperationRegistry::bundled()?,
        };
        Ok(registry)
    }
}

#[cfg(test)]
mod tests;
