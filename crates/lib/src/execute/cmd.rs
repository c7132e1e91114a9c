//! Shell command execution shared by the command-based collaborators.
//!
//! Unlike an isolated build sandbox, commands inherit the caller's environment
//! (so `PATH` and toolchains resolve normally) and get `MODBUILD_*` variables
//! describing the build on top of it.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::options::BuildOptions;

/// Errors from running a shell command.
#[derive(Debug, Error)]
pub enum CommandError {
  /// The shell could not be spawned.
  #[error("failed to spawn `{cmd}`: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The command exited unsuccessfully.
  #[error("command failed with {}: {cmd}{}", describe_exit(.code), format_stderr(.stderr))]
  Failed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "termination by signal".to_string(),
  }
}

fn format_stderr(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!("\n{}", stderr)
  }
}

/// Run `cmd` through a shell.
///
/// # Arguments
///
/// * `cmd` - The command string to execute
/// * `env` - Variables added on top of the inherited environment
/// * `cwd` - Working directory
/// * `shell` - Shell override (defaults to /bin/sh on Unix, powershell.exe on Windows)
///
/// # Returns
///
/// The trimmed stdout of the command on success.
pub async fn run_command(
  cmd: &str,
  env: &BTreeMap<String, String>,
  cwd: &Path,
  shell: Option<&str>,
) -> Result<String, CommandError> {
  info!(cmd = %cmd, "executing command");

  let (shell_cmd, shell_args) = get_shell(shell);

  let mut command = Command::new(&shell_cmd);
  command.args(&shell_args).arg(cmd).current_dir(cwd).envs(env);

  debug!(shell = %shell_cmd, working_dir = ?cwd, "spawning process");

  let output = command.output().await.map_err(|source| CommandError::Spawn {
    cmd: cmd.to_string(),
    source,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }

    return Err(CommandError::Failed {
      cmd: cmd.to_string(),
      code: output.status.code(),
      stderr,
    });
  }

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }
  if !stderr.is_empty() {
    debug!(stderr = %stderr, "command stderr");
  }

  Ok(stdout)
}

/// Get the shell command and arguments for the current platform.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
      ],
    )
  }
}

fn flag(value: bool) -> String {
  if value { "true" } else { "false" }.to_string()
}

/// Variables describing the invocation-wide options.
pub fn options_env(options: &BuildOptions) -> BTreeMap<String, String> {
  let mut env = BTreeMap::new();
  env.insert("MODBUILD_TSCONFIG".to_string(), options.tsconfig.display().to_string());
  env.insert("MODBUILD_DTS".to_string(), flag(options.dts));
  env.insert("MODBUILD_CLEAR".to_string(), flag(options.clear));
  if let Some(platform) = &options.platform {
    env.insert("MODBUILD_PLATFORM".to_string(), platform.to_string());
  }
  if let Some(config_file) = &options.config_file {
    env.insert("MODBUILD_CONFIG_FILE".to_string(), config_file.display().to_string());
  }
  env
}

/// Variables describing one build config, layered over [`options_env`].
///
/// The config's own `env` entries are applied last and win on conflict.
/// A config's `dts` flag only turns declarations on; it never overrides a
/// disabled `--no-dts`.
pub fn config_env(config: &BuildConfig, options: &BuildOptions) -> BTreeMap<String, String> {
  let mut env = options_env(options);
  env.insert("MODBUILD_NAME".to_string(), config.display_name());
  env.insert("MODBUILD_BUILD_TYPE".to_string(), config.build_type.to_string());
  env.insert("MODBUILD_FORMAT".to_string(), config.format.to_string());
  env.insert("MODBUILD_TARGET".to_string(), config.target.clone());
  env.insert("MODBUILD_INPUT".to_string(), config.input.join(" "));
  env.insert("MODBUILD_OUT_DIR".to_string(), config.out_dir.display().to_string());
  env.insert("MODBUILD_SOURCE_MAP".to_string(), flag(config.source_map));
  env.insert("MODBUILD_DTS".to_string(), flag(options.dts && config.dts));
  env.extend(config.env.iter().map(|(k, v)| (k.clone(), v.clone())));
  env
}
