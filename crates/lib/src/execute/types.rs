//! Types for build orchestration.
//!
//! This module defines the error type, status and outcome types, and the
//! configuration used when orchestrating a build.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::BuildConfig;
use crate::hooks::HookPoint;
use crate::options::PlatformSelector;

/// Error type returned by collaborators (hooks, executors, strategies).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Status of a single task or of the whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
  Success,
  Failure,
}

impl BuildStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Success => "success",
      Self::Failure => "failure",
    }
  }
}

impl fmt::Display for BuildStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Errors that abort a build invocation.
///
/// Every variant keeps the collaborator's original error as its source; the
/// message itself names only the failing step.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The platform strategy failed.
  #[error("platform build ({platform}) failed")]
  Platform {
    platform: PlatformSelector,
    #[source]
    source: BoxError,
  },

  /// A task executor failed for one build config.
  #[error("build task #{index} ({name}) failed")]
  Task {
    index: usize,
    name: String,
    #[source]
    source: BoxError,
  },

  /// A lifecycle hook failed.
  #[error("{point} hook failed")]
  Hook {
    point: HookPoint,
    #[source]
    source: BoxError,
  },

  /// A worker task panicked or was aborted by the runtime.
  #[error("build task panicked: {message}")]
  TaskPanicked { message: String },
}

impl BuildError {
  /// Returns true if the error came from a lifecycle hook.
  pub fn is_hook_failure(&self) -> bool {
    matches!(self, Self::Hook { .. })
  }

  /// Returns true if the error came from the platform strategy or a task.
  pub fn is_delegation_failure(&self) -> bool {
    !self.is_hook_failure()
  }

  /// Index of the failing build config, if the error belongs to one task.
  pub fn task_index(&self) -> Option<usize> {
    match self {
      Self::Task { index, .. } => Some(*index),
      _ => None,
    }
  }
}

/// Outcome of one build task, handed to the "after task" hook.
#[derive(Debug, Clone, Copy)]
pub struct TaskOutcome<'a> {
  /// Position of the config in the resolved list.
  pub index: usize,
  pub status: BuildStatus,
  pub config: &'a BuildConfig,
  /// Time spent in the task executor.
  pub elapsed: Duration,
}

/// Which path a build invocation took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BuildKind {
  /// The platform strategy ran; no per-config tasks.
  Platform { selector: PlatformSelector },
  /// The module build ran `tasks` per-config tasks.
  Module { tasks: usize },
}

/// Summary returned by a successful build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
  #[serde(flatten)]
  pub kind: BuildKind,
  pub status: BuildStatus,
  #[serde(skip)]
  pub elapsed: Duration,
}

impl BuildSummary {
  /// Number of per-config tasks that ran.
  pub fn task_count(&self) -> usize {
    match self.kind {
      BuildKind::Platform { .. } => 0,
      BuildKind::Module { tasks } => tasks,
    }
  }
}

/// Configuration for build orchestration.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
  /// Maximum number of build tasks in flight at once.
  pub concurrency: usize,

  /// Shell used by command-based collaborators.
  /// If None, uses /bin/sh (Unix) or powershell.exe (Windows).
  pub shell: Option<String>,
}

impl Default for ExecuteConfig {
  fn default() -> Self {
    Self {
      concurrency: default_concurrency(),
      shell: None,
    }
  }
}

/// Default concurrency: the number of CPUs, never below two.
pub fn default_concurrency() -> usize {
  std::thread::available_parallelism()
    .map(|p| p.get())
    .unwrap_or(4)
    .max(2)
}

#[cfg(test)]
mod tests {
  use std::error::Error as _;

  use super::*;

  #[test]
  fn default_concurrency_allows_overlap() {
    let config = ExecuteConfig::default();
    assert!(config.concurrency >= 2);
    assert!(config.shell.is_none());
  }

  #[test]
  fn hook_failures_are_not_delegation_failures() {
    let hook = BuildError::Hook {
      point: HookPoint::AfterBuild,
      source: "reporter offline".into(),
    };
    let task = BuildError::Task {
      index: 1,
      name: "bundle-esm".to_string(),
      source: "syntax error".into(),
    };

    assert!(hook.is_hook_failure());
    assert!(!hook.is_delegation_failure());
    assert!(task.is_delegation_failure());
    assert_eq!(task.task_index(), Some(1));
    assert_eq!(hook.task_index(), None);
  }

  #[test]
  fn error_messages_leave_cause_to_source() {
    let err = BuildError::Task {
      index: 0,
      name: "bundle-cjs".to_string(),
      source: "exit code 2".into(),
    };
    assert_eq!(err.to_string(), "build task #0 (bundle-cjs) failed");
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("exit code 2"));

    let err = BuildError::Platform {
      platform: PlatformSelector::from_names(["ios"]),
      source: "xcode missing".into(),
    };
    assert_eq!(err.to_string(), "platform build (ios) failed");
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("xcode missing"));
  }

  #[test]
  fn summary_task_count() {
    let module = BuildSummary {
      kind: BuildKind::Module { tasks: 3 },
      status: BuildStatus::Success,
      elapsed: Duration::ZERO,
    };
    let platform = BuildSummary {
      kind: BuildKind::Platform {
        selector: PlatformSelector::All,
      },
      status: BuildStatus::Success,
      elapsed: Duration::ZERO,
    };

    assert_eq!(module.task_count(), 3);
    assert_eq!(platform.task_count(), 0);
  }
}
