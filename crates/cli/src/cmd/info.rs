//! Implementation of the `modbuild info` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use modbuild_lib::{BuildConfig, ExecuteConfig, ProjectConfig};

use crate::output::{OutputFormat, print_info, print_json, print_stat};

#[derive(Serialize)]
struct InfoOutput<'a> {
  config: String,
  concurrency: usize,
  shell: Option<&'a str>,
  task: Option<&'a str>,
  platform: Option<&'a str>,
  builds: &'a [BuildConfig],
}

/// Print the project settings and resolved build configs.
pub fn cmd_info(config: &Path, output: OutputFormat) -> Result<()> {
  let project =
    ProjectConfig::load(config).with_context(|| format!("Failed to load config: {}", config.display()))?;
  let execute: ExecuteConfig = project.execute_config(None);

  let info = InfoOutput {
    config: config.display().to_string(),
    concurrency: execute.concurrency,
    shell: project.shell.as_deref(),
    task: project.task.as_ref().map(|t| t.command.as_str()),
    platform: project.platform.as_ref().map(|p| p.command.as_str()),
    builds: &project.builds,
  };

  if output.is_json() {
    return print_json(&info);
  }

  print_info(&format!("Project: {}", info.config));
  print_stat("Concurrency", &info.concurrency.to_string());
  print_stat("Shell", info.shell.unwrap_or("default"));
  print_stat("Task", info.task.unwrap_or("(none)"));
  print_stat("Platform", info.platform.unwrap_or("(none)"));
  print_stat("Hooks", if project.hooks.is_empty() { "(none)" } else { "configured" });

  println!();
  print_info(&format!("Builds: {}", project.builds.len()));
  for (index, build) in project.builds.iter().enumerate() {
    println!(
      "  [{}] {} ({} {}, {}) -> {}",
      index,
      build.display_name(),
      build.build_type,
      build.format,
      build.target,
      build.out_dir.display()
    );
  }

  Ok(())
}
