//! Lifecycle hooks invoked around a build.
//!
//! Hooks run at three fixed points:
//! - `before_build_task`: before a build config's task executor is called
//! - `after_build_task`: after that task completed successfully
//! - `after_build`: once per module build, after every task settled
//!
//! Any hook error aborts the build. Hooks are shared across concurrently
//! running tasks, so implementations must be `Send + Sync`.
//!
//! # Submodules
//!
//! - [`chain`] - Runs several hooks in registration order
//! - [`command`] - Hooks backed by shell commands
//! - [`logging`] - Hooks that report progress through `tracing`

pub mod chain;
pub mod command;
pub mod logging;

use std::fmt;

use async_trait::async_trait;

use crate::config::BuildConfig;
use crate::execute::{BoxError, BuildStatus, TaskOutcome};
use crate::options::BuildOptions;

pub use chain::HookChain;
pub use command::{CommandHooks, HookCommands};
pub use logging::LoggingHooks;

/// Identifies a hook point, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
  BeforeBuildTask,
  AfterBuildTask,
  AfterBuild,
}

impl HookPoint {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::BeforeBuildTask => "before_build_task",
      Self::AfterBuildTask => "after_build_task",
      Self::AfterBuild => "after_build",
    }
  }
}

impl fmt::Display for HookPoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Arguments of the "before task" hook.
#[derive(Debug, Clone, Copy)]
pub struct BeforeTaskContext<'a> {
  pub index: usize,
  pub config: &'a BuildConfig,
  pub options: &'a BuildOptions,
}

/// Arguments of the "after build" hook.
#[derive(Debug, Clone, Copy)]
pub struct AfterBuildContext<'a> {
  pub status: BuildStatus,
  /// The original config list, in input order.
  pub configs: &'a [BuildConfig],
}

/// Lifecycle callbacks around a module build.
///
/// Every method defaults to a no-op, so implementations only override the
/// points they care about.
#[async_trait]
pub trait BuildHooks: Send + Sync {
  async fn before_build_task(&self, _ctx: &BeforeTaskContext<'_>) -> Result<(), BoxError> {
    Ok(())
  }

  async fn after_build_task(&self, _outcome: &TaskOutcome<'_>) -> Result<(), BoxError> {
    Ok(())
  }

  async fn after_build(&self, _ctx: &AfterBuildContext<'_>) -> Result<(), BoxError> {
    Ok(())
  }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl BuildHooks for NoopHooks {}
