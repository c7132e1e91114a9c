//! Invocation-wide build options.
//!
//! `BuildOptions` is produced once per invocation (usually from CLI flags) and
//! shared read-only by every task, hook, and strategy.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Which platforms a platform build targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformSelector {
  /// Platform flag given without names: build every platform.
  All,
  /// Only the named platforms.
  Only(Vec<String>),
}

impl PlatformSelector {
  /// Build a selector from the raw names passed on the command line.
  ///
  /// An empty list means "all platforms".
  pub fn from_names<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let names: Vec<String> = names
      .into_iter()
      .map(Into::into)
      .filter(|name| !name.trim().is_empty())
      .collect();

    if names.is_empty() { Self::All } else { Self::Only(names) }
  }
}

impl fmt::Display for PlatformSelector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => write!(f, "all"),
      Self::Only(names) => write!(f, "{}", names.join(",")),
    }
  }
}

/// Options for a whole build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  /// When set, the platform build runs instead of the per-config module build.
  pub platform: Option<PlatformSelector>,

  /// Path to the tsconfig handed to task executors.
  pub tsconfig: PathBuf,

  /// Whether type declarations should be emitted.
  pub dts: bool,

  /// Whether output directories should be cleared before building.
  pub clear: bool,

  /// The project file the build configs were loaded from, if any.
  /// Exported to commands as `MODBUILD_CONFIG_FILE`.
  pub config_file: Option<PathBuf>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      platform: None,
      tsconfig: PathBuf::from("./tsconfig.json"),
      dts: true,
      clear: true,
      config_file: None,
    }
  }
}

impl BuildOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_platform(mut self, platform: PlatformSelector) -> Self {
    self.platform = Some(platform);
    self
  }

  pub fn with_tsconfig(mut self, tsconfig: impl Into<PathBuf>) -> Self {
    self.tsconfig = tsconfig.into();
    self
  }

  pub fn with_dts(mut self, dts: bool) -> Self {
    self.dts = dts;
    self
  }

  pub fn with_clear(mut self, clear: bool) -> Self {
    self.clear = clear;
    self
  }

  pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
    self.config_file = Some(path.into());
    self
  }
}
