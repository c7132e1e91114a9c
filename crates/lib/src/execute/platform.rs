//! Platform build strategies.
//!
//! A platform build replaces the per-config module build entirely; it only
//! receives the invocation options.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::cmd::{options_env, run_command};
use super::types::BoxError;
use crate::options::BuildOptions;

/// Runs the platform-oriented build flow.
#[async_trait]
pub trait PlatformStrategy: Send + Sync {
  async fn build_platform(&self, options: &BuildOptions) -> Result<(), BoxError>;
}

/// Runs a shell command once for the whole platform build.
///
/// The command sees `MODBUILD_PLATFORM` plus the variables from [`options_env`].
#[derive(Debug, Clone)]
pub struct CommandPlatformStrategy {
  command: String,
  cwd: PathBuf,
  shell: Option<String>,
}

impl CommandPlatformStrategy {
  pub fn new(command: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      command: command.into(),
      cwd: cwd.into(),
      shell: None,
    }
  }

  pub fn with_shell(mut self, shell: Option<String>) -> Self {
    self.shell = shell;
    self
  }
}

#[async_trait]
impl PlatformStrategy for CommandPlatformStrategy {
  async fn build_platform(&self, options: &BuildOptions) -> Result<(), BoxError> {
    let env = options_env(options);
    run_command(&self.command, &env, &self.cwd, self.shell.as_deref()).await?;
    Ok(())
  }
}

/// Error returned by [`UnsupportedPlatform`].
#[derive(Debug, Error)]
#[error("no platform build is configured")]
pub struct PlatformNotConfigured;

/// Platform strategy for projects without a platform build; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

#[async_trait]
impl PlatformStrategy for UnsupportedPlatform {
  async fn build_platform(&self, _options: &BuildOptions) -> Result<(), BoxError> {
    Err(Box::new(PlatformNotConfigured))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::options::PlatformSelector;

  #[tokio::test]
  async fn unsupported_platform_fails() {
    let options = BuildOptions::default().with_platform(PlatformSelector::All);

    let err = UnsupportedPlatform.build_platform(&options).await.unwrap_err();

    assert!(err.is::<PlatformNotConfigured>());
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn command_sees_platform_selector() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let strategy = CommandPlatformStrategy::new("printf '%s' \"$MODBUILD_PLATFORM\" > platform.txt", temp_dir.path());
    let options = BuildOptions::default().with_platform(PlatformSelector::from_names(["ios"]));

    strategy.build_platform(&options).await.unwrap();

    let written = std::fs::read_to_string(temp_dir.path().join("platform.txt")).unwrap();
    assert_eq!(written, "ios");
  }
}
