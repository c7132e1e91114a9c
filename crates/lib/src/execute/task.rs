//! Per-config task execution.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::cmd::{config_env, run_command};
use super::types::BoxError;
use crate::config::BuildConfig;
use crate::options::BuildOptions;

/// Builds a single config.
///
/// Implementations must not depend on other configs of the same invocation;
/// tasks run concurrently and in no particular order.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
  async fn run_build_task(&self, config: &BuildConfig, options: &BuildOptions) -> Result<(), BoxError>;
}

/// Runs a shell command once per build config.
///
/// The command sees the variables from [`config_env`].
#[derive(Debug, Clone)]
pub struct CommandTaskExecutor {
  command: String,
  cwd: PathBuf,
  shell: Option<String>,
}

impl CommandTaskExecutor {
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
impl TaskExecutor for CommandTaskExecutor {
  async fn run_build_task(&self, config: &BuildConfig, options: &BuildOptions) -> Result<(), BoxError> {
    let env = config_env(config, options);
    run_command(&self.command, &env, &self.cwd, self.shell.as_deref()).await?;
    Ok(())
  }
}

/// Error returned by [`UnconfiguredTask`].
#[derive(Debug, Error)]
#[error("no task command is configured")]
pub struct TaskNotConfigured;

/// Task executor for projects without a task command; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredTask;

#[async_trait]
impl TaskExecutor for UnconfiguredTask {
  async fn run_build_task(&self, _config: &BuildConfig, _options: &BuildOptions) -> Result<(), BoxError> {
    Err(Box::new(TaskNotConfigured))
  }
}
