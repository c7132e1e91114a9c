//! Implementation of the `modbuild build` command.
//!
//! Loads the project file, wires the command collaborators into an
//! orchestrator, and runs the build on a single-threaded runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use modbuild_lib::execute::{
  BuildKind, BuildSummary, CommandPlatformStrategy, CommandTaskExecutor, PlatformStrategy, TaskExecutor,
  UnconfiguredTask, UnsupportedPlatform,
};
use modbuild_lib::hooks::{CommandHooks, HookChain, LoggingHooks};
use modbuild_lib::{BuildOptions, Orchestrator, PlatformSelector, ProjectConfig};

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_success};

/// Arguments of the build command, as parsed from the command line.
pub struct BuildArgs {
  pub config: PathBuf,
  pub platform: Option<Vec<String>>,
  pub concurrency: Option<usize>,
  pub tsconfig: PathBuf,
  pub dts: bool,
  pub clear: bool,
  pub output: OutputFormat,
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let project = ProjectConfig::load(&args.config)
    .with_context(|| format!("Failed to load config: {}", args.config.display()))?;
  let config_file = std::path::absolute(&args.config)
    .with_context(|| format!("Failed to resolve config path: {}", args.config.display()))?;
  let root = project_root(&config_file);
  debug!(config = %config_file.display(), root = %root.display(), builds = project.builds.len(), "loaded project");

  let mut options = BuildOptions::new()
    .with_tsconfig(resolve_in_root(&root, &args.tsconfig))
    .with_dts(args.dts)
    .with_clear(args.clear)
    .with_config_file(&config_file);
  if let Some(names) = args.platform {
    options = options.with_platform(PlatformSelector::from_names(names));
  }

  let orchestrator = build_orchestrator(&project, &options, &root, args.concurrency);

  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;
  let summary = rt
    .block_on(orchestrator.run(options, project.builds))
    .context("Build failed")?;

  if args.output.is_json() {
    return print_json(&summary);
  }
  print_summary(&summary);
  Ok(())
}

/// Commands run relative to the directory holding the project file.
fn project_root(config: &Path) -> PathBuf {
  match config.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}

/// Relative paths given on the command line name files in the project directory.
fn resolve_in_root(root: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    return path.to_path_buf();
  }
  root.join(path.strip_prefix(".").unwrap_or(path))
}

fn build_orchestrator(
  project: &ProjectConfig,
  options: &BuildOptions,
  root: &Path,
  concurrency: Option<usize>,
) -> Orchestrator {
  let shell = project.shell.clone();

  let hooks = HookChain::new().with(Arc::new(LoggingHooks)).with(Arc::new(
    CommandHooks::new(project.hooks.clone(), options.clone(), root).with_shell(shell.clone()),
  ));

  let executor: Arc<dyn TaskExecutor> = match &project.task {
    Some(task) => Arc::new(CommandTaskExecutor::new(&task.command, root).with_shell(shell.clone())),
    None => Arc::new(UnconfiguredTask),
  };

  let platform: Arc<dyn PlatformStrategy> = match &project.platform {
    Some(platform) => Arc::new(CommandPlatformStrategy::new(&platform.command, root).with_shell(shell)),
    None => Arc::new(UnsupportedPlatform),
  };

  Orchestrator::new(Arc::new(hooks), executor, platform).with_config(project.execute_config(concurrency))
}

fn print_summary(summary: &BuildSummary) {
  let elapsed = format_duration(summary.elapsed);
  match &summary.kind {
    BuildKind::Platform { selector } => {
      print_success(&format!("Built platform {} in {}", selector, elapsed));
    }
    BuildKind::Module { tasks: 0 } => {
      print_info("No build configs; nothing to build");
    }
    BuildKind::Module { tasks } => {
      print_success(&format!("Built {} target(s) in {}", tasks, elapsed));
    }
  }
}
