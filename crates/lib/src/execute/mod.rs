//! Build orchestration.
//!
//! This module provides the main entry point for running a build. It:
//! - Chooses between the platform build and the per-config module build
//! - Runs module build tasks with bounded concurrency
//! - Invokes lifecycle hooks around each task and once after the build
//! - Aborts on the first task, strategy, or hook failure

pub mod cmd;
pub mod mapper;
pub mod platform;
pub mod task;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::BuildConfig;
use crate::hooks::{AfterBuildContext, BeforeTaskContext, BuildHooks, HookPoint};
use crate::options::{BuildOptions, PlatformSelector};

pub use cmd::{CommandError, config_env, options_env, run_command};
pub use mapper::for_each;
pub use platform::{CommandPlatformStrategy, PlatformNotConfigured, PlatformStrategy, UnsupportedPlatform};
pub use task::{CommandTaskExecutor, TaskExecutor, TaskNotConfigured, UnconfiguredTask};
pub use types::{BoxError, BuildError, BuildKind, BuildStatus, BuildSummary, ExecuteConfig, TaskOutcome};

/// The two mutually exclusive ways a build invocation can go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPath {
  /// Delegate everything to the platform strategy.
  Platform(PlatformSelector),
  /// Run one task per build config.
  Module,
}

impl BuildPath {
  /// Pick the path for `options`: a platform selector always wins.
  pub fn select(options: &BuildOptions) -> Self {
    match &options.platform {
      Some(selector) => Self::Platform(selector.clone()),
      None => Self::Module,
    }
  }
}

/// Runs builds against injected collaborators.
///
/// The orchestrator owns no build logic itself; it decides which path to take,
/// schedules tasks, and sequences hooks.
#[derive(Clone)]
pub struct Orchestrator {
  hooks: Arc<dyn BuildHooks>,
  executor: Arc<dyn TaskExecutor>,
  platform: Arc<dyn PlatformStrategy>,
  config: ExecuteConfig,
}

impl std::fmt::Debug for Orchestrator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Orchestrator").field("config", &self.config).finish_non_exhaustive()
  }
}

impl Orchestrator {
  pub fn new(
    hooks: Arc<dyn BuildHooks>,
    executor: Arc<dyn TaskExecutor>,
    platform: Arc<dyn PlatformStrategy>,
  ) -> Self {
    Self {
      hooks,
      executor,
      platform,
      config: ExecuteConfig::default(),
    }
  }

  pub fn with_config(mut self, config: ExecuteConfig) -> Self {
    self.config = config;
    self
  }

  /// Run one build invocation.
  ///
  /// With a platform selector set, only the platform strategy runs and
  /// `configs` is never consulted. Otherwise every config gets
  /// `before_build_task`, the task executor, and `after_build_task`, in that
  /// order, with at most `concurrency` configs in flight; then `after_build`
  /// runs exactly once with the original list, even when it is empty.
  ///
  /// The first failure is returned unchanged in meaning and `after_build` is
  /// not invoked. Tasks already running when a sibling fails are awaited but
  /// their outcomes ignored; tasks not yet started never start.
  pub async fn run(&self, options: BuildOptions, configs: Vec<BuildConfig>) -> Result<BuildSummary, BuildError> {
    let started = Instant::now();

    match BuildPath::select(&options) {
      BuildPath::Platform(selector) => {
        info!(platform = %selector, "running platform build");

        if let Err(source) = self.platform.build_platform(&options).await {
          error!(platform = %selector, error = %source, "platform build failed");
          return Err(BuildError::Platform {
            platform: selector,
            source,
          });
        }

        let elapsed = started.elapsed();
        info!(platform = %selector, elapsed_ms = elapsed.as_millis() as u64, "platform build complete");

        Ok(BuildSummary {
          kind: BuildKind::Platform { selector },
          status: BuildStatus::Success,
          elapsed,
        })
      }
      BuildPath::Module => self.run_module_build(options, configs, started).await,
    }
  }

  async fn run_module_build(
    &self,
    options: BuildOptions,
    configs: Vec<BuildConfig>,
    started: Instant,
  ) -> Result<BuildSummary, BuildError> {
    let options = Arc::new(options);
    let configs: Arc<[BuildConfig]> = configs.into();
    let tasks = configs.len();

    if tasks == 0 {
      info!("no build configs, skipping build tasks");
    } else {
      info!(tasks, concurrency = self.config.concurrency, "running module build");

      let hooks = self.hooks.clone();
      let executor = self.executor.clone();
      let task_configs = configs.clone();
      let task_options = options.clone();

      for_each((0..tasks).collect(), self.config.concurrency, move |_, index: usize| {
        let hooks = hooks.clone();
        let executor = executor.clone();
        let configs = task_configs.clone();
        let options = task_options.clone();
        async move { run_build_task(index, &configs, &options, hooks.as_ref(), executor.as_ref()).await }
      })
      .await?;
    }

    let status = BuildStatus::Success;
    self
      .hooks
      .after_build(&AfterBuildContext {
        status,
        configs: &configs,
      })
      .await
      .map_err(|source| hook_failed(HookPoint::AfterBuild, source))?;

    let elapsed = started.elapsed();
    info!(tasks, elapsed_ms = elapsed.as_millis() as u64, "module build complete");

    Ok(BuildSummary {
      kind: BuildKind::Module { tasks },
      status,
      elapsed,
    })
  }
}

/// Run the hook/execute/hook sequence for one config.
async fn run_build_task(
  index: usize,
  configs: &[BuildConfig],
  options: &BuildOptions,
  hooks: &dyn BuildHooks,
  executor: &dyn TaskExecutor,
) -> Result<(), BuildError> {
  let config = &configs[index];
  debug!(index, name = %config.display_name(), "build task started");

  hooks
    .before_build_task(&BeforeTaskContext { index, config, options })
    .await
    .map_err(|source| hook_failed(HookPoint::BeforeBuildTask, source))?;

  let started = Instant::now();
  if let Err(source) = executor.run_build_task(config, options).await {
    let name = config.display_name();
    error!(index, name = %name, error = %source, "build task failed");
    return Err(BuildError::Task { index, name, source });
  }

  let outcome = TaskOutcome {
    index,
    status: BuildStatus::Success,
    config,
    elapsed: started.elapsed(),
  };

  hooks
    .after_build_task(&outcome)
    .await
    .map_err(|source| hook_failed(HookPoint::AfterBuildTask, source))?;

  debug!(index, elapsed_ms = outcome.elapsed.as_millis() as u64, "build task finished");
  Ok(())
}

fn hook_failed(point: HookPoint, source: BoxError) -> BuildError {
  error!(hook = %point, error = %source, "hook failed");
  BuildError::Hook { point, source }
}
