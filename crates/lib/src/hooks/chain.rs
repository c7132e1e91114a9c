//! Ordered composition of several hook implementations.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AfterBuildContext, BeforeTaskContext, BuildHooks};
use crate::execute::{BoxError, TaskOutcome};

/// Runs a list of hooks in registration order.
///
/// The first failing hook stops the chain; hooks registered after it are not
/// called for that hook point.
#[derive(Default, Clone)]
pub struct HookChain {
  hooks: Vec<Arc<dyn BuildHooks>>,
}

impl HookChain {
  pub fn new() -> Self {
    Self { hooks: Vec::new() }
  }

  /// Append `hook`; it runs after every hook registered before it.
  pub fn with(mut self, hook: Arc<dyn BuildHooks>) -> Self {
    self.hooks.push(hook);
    self
  }
}

impl std::fmt::Debug for HookChain {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HookChain").field("hooks", &self.hooks.len()).finish()
  }
}

#[async_trait]
impl BuildHooks for HookChain {
  async fn before_build_task(&self, ctx: &BeforeTaskContext<'_>) -> Result<(), BoxError> {
    for hook in &self.hooks {
      hook.before_build_task(ctx).await?;
    }
    Ok(())
  }

  async fn after_build_task(&self, outcome: &TaskOutcome<'_>) -> Result<(), BoxError> {
    for hook in &self.hooks {
      hook.after_build_task(outcome).await?;
    }
    Ok(())
  }

  async fn after_build(&self, ctx: &AfterBuildContext<'_>) -> Result<(), BoxError> {
    for hook in &self.hooks {
      hook.after_build(ctx).await?;
    }
    Ok(())
  }
}
