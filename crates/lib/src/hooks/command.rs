//! Hooks backed by shell commands from the project file.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{AfterBuildContext, BeforeTaskContext, BuildHooks};
use crate::execute::{BoxError, TaskOutcome, config_env, run_command};
use crate::options::BuildOptions;

/// The `[hooks]` table of the project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookCommands {
  pub before_task: Option<String>,
  pub after_task: Option<String>,
  pub after_build: Option<String>,
}

impl HookCommands {
  pub fn is_empty(&self) -> bool {
    self.before_task.is_none() && self.after_task.is_none() && self.after_build.is_none()
  }
}

/// Runs the configured hook commands.
///
/// Per-task commands see the build config variables plus `MODBUILD_STATUS`;
/// the `after_build` command sees `MODBUILD_STATUS` and `MODBUILD_TASK_COUNT`.
#[derive(Debug, Clone)]
pub struct CommandHooks {
  commands: HookCommands,
  options: BuildOptions,
  cwd: PathBuf,
  shell: Option<String>,
}

impl CommandHooks {
  pub fn new(commands: HookCommands, options: BuildOptions, cwd: impl Into<PathBuf>) -> Self {
    Self {
      commands,
      options,
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
impl BuildHooks for CommandHooks {
  async fn before_build_task(&self, ctx: &BeforeTaskContext<'_>) -> Result<(), BoxError> {
    let Some(cmd) = &self.commands.before_task else {
      return Ok(());
    };
    let env = config_env(ctx.config, ctx.options);
    run_command(cmd, &env, &self.cwd, self.shell.as_deref()).await?;
    Ok(())
  }

  async fn after_build_task(&self, outcome: &TaskOutcome<'_>) -> Result<(), BoxError> {
    let Some(cmd) = &self.commands.after_task else {
      return Ok(());
    };
    let mut env = config_env(outcome.config, &self.options);
    env.insert("MODBUILD_STATUS".to_string(), outcome.status.to_string());
    run_command(cmd, &env, &self.cwd, self.shell.as_deref()).await?;
    Ok(())
  }

  async fn after_build(&self, ctx: &AfterBuildContext<'_>) -> Result<(), BoxError> {
    let Some(cmd) = &self.commands.after_build else {
      return Ok(());
    };
    let mut env = crate::execute::options_env(&self.options);
    env.insert("MODBUILD_STATUS".to_string(), ctx.status.to_string());
    env.insert("MODBUILD_TASK_COUNT".to_string(), ctx.configs.len().to_string());
    run_command(cmd, &env, &self.cwd, self.shell.as_deref()).await?;
    Ok(())
  }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::config::{BuildConfig, Format};
  use crate::execute::BuildStatus;
  use tempfile::TempDir;

  #[tokio::test]
  async fn unset_commands_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let hooks = CommandHooks::new(HookCommands::default(), BuildOptions::default(), temp_dir.path());

    hooks
      .after_build(&AfterBuildContext {
        status: BuildStatus::Success,
        configs: &[],
      })
      .await
      .unwrap();

    assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
  }

  #[tokio::test]
  async fn after_task_sees_status_and_config() {
    let temp_dir = TempDir::new().unwrap();
    let commands = HookCommands {
      after_task: Some("printf '%s %s' \"$MODBUILD_NAME\" \"$MODBUILD_STATUS\" >> tasks.log".to_string()),
      ..HookCommands::default()
    };
    let hooks = CommandHooks::new(commands, BuildOptions::default(), temp_dir.path());
    let config = BuildConfig::new(Format::Esm).with_name("browser");

    hooks
      .after_build_task(&TaskOutcome {
        index: 0,
        status: BuildStatus::Success,
        config: &config,
        elapsed: Duration::from_millis(1),
      })
      .await
      .unwrap();

    let log = std::fs::read_to_string(temp_dir.path().join("tasks.log")).unwrap();
    assert_eq!(log, "browser success");
  }

  #[tokio::test]
  async fn after_build_sees_task_count() {
    let temp_dir = TempDir::new().unwrap();
    let commands = HookCommands {
      after_build: Some("printf '%s' \"$MODBUILD_TASK_COUNT\" > count.txt".to_string()),
      ..HookCommands::default()
    };
    let hooks = CommandHooks::new(commands, BuildOptions::default(), temp_dir.path());
    let configs = vec![BuildConfig::default(), BuildConfig::new(Format::Esm)];

    hooks
      .after_build(&AfterBuildContext {
        status: BuildStatus::Success,
        configs: &configs,
      })
      .await
      .unwrap();

    let count = std::fs::read_to_string(temp_dir.path().join("count.txt")).unwrap();
    assert_eq!(count, "2");
  }

  #[tokio::test]
  async fn failing_hook_command_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let commands = HookCommands {
      before_task: Some("exit 1".to_string()),
      ..HookCommands::default()
    };
    let options = BuildOptions::default();
    let hooks = CommandHooks::new(commands, options.clone(), temp_dir.path());
    let config = BuildConfig::default();

    let result = hooks
      .before_build_task(&BeforeTaskContext {
        index: 0,
        config: &config,
        options: &options,
      })
      .await;

    assert!(result.is_err());
  }
}
