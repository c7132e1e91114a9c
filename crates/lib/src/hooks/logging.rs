//! Hooks that report build progress through `tracing`.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{AfterBuildContext, BeforeTaskContext, BuildHooks};
use crate::execute::{BoxError, TaskOutcome};

/// Logs every hook point. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHooks;

#[async_trait]
impl BuildHooks for LoggingHooks {
  async fn before_build_task(&self, ctx: &BeforeTaskContext<'_>) -> Result<(), BoxError> {
    debug!(
      index = ctx.index,
      name = %ctx.config.display_name(),
      format = %ctx.config.format,
      build_type = %ctx.config.build_type,
      out_dir = %ctx.config.out_dir.display(),
      "starting build task"
    );
    Ok(())
  }

  async fn after_build_task(&self, outcome: &TaskOutcome<'_>) -> Result<(), BoxError> {
    info!(
      index = outcome.index,
      name = %outcome.config.display_name(),
      status = %outcome.status,
      elapsed_ms = outcome.elapsed.as_millis() as u64,
      "build task finished"
    );
    Ok(())
  }

  async fn after_build(&self, ctx: &AfterBuildContext<'_>) -> Result<(), BoxError> {
    info!(status = %ctx.status, configs = ctx.configs.len(), "build finished");
    Ok(())
  }
}
