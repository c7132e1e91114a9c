//! Project file loading.
//!
//! The project file lists already-resolved build configs; nothing is merged,
//! inherited, or defaulted beyond the per-field serde defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::types::BuildConfig;
use crate::execute::ExecuteConfig;
use crate::hooks::HookCommands;

/// File name looked up when no project file is given.
pub const DEFAULT_CONFIG_FILE: &str = "modbuild.toml";

/// Errors from loading a project file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid config: {0}")]
  Invalid(String),
}

/// A shell command run by a command-based collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskCommand {
  pub command: String,
}

/// Contents of `modbuild.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
  /// Maximum number of build tasks in flight.
  pub concurrency: Option<usize>,

  /// Shell override for every command.
  pub shell: Option<String>,

  /// Command run once per build config.
  pub task: Option<TaskCommand>,

  /// Command run for platform builds.
  pub platform: Option<TaskCommand>,

  #[serde(default)]
  pub hooks: HookCommands,

  /// Resolved build configs, in order.
  #[serde(default, rename = "build")]
  pub builds: Vec<BuildConfig>,
}

impl ProjectConfig {
  /// Load and validate a project file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.validate()?;

    debug!(path = %path.display(), builds = config.builds.len(), "loaded project file");
    Ok(config)
  }

  /// Parse and validate a project file from a string.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
      path: PathBuf::from("<string>"),
      source,
    })?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.concurrency == Some(0) {
      return Err(ConfigError::Invalid("concurrency must be at least 1".to_string()));
    }
    if let Some(task) = &self.task
      && task.command.trim().is_empty()
    {
      return Err(ConfigError::Invalid("task command must not be empty".to_string()));
    }
    if let Some(platform) = &self.platform
      && platform.command.trim().is_empty()
    {
      return Err(ConfigError::Invalid("platform command must not be empty".to_string()));
    }
    Ok(())
  }

  /// Execution settings, with `concurrency` overriding the project value.
  pub fn execute_config(&self, concurrency: Option<usize>) -> ExecuteConfig {
    let defaults = ExecuteConfig::default();
    ExecuteConfig {
      concurrency: concurrency.or(self.concurrency).unwrap_or(defaults.concurrency).max(1),
      shell: self.shell.clone(),
    }
  }
}
