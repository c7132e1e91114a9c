use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a build config produces its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildType {
  /// Bundle all inputs into single files.
  #[default]
  Bundle,
  /// Transform files one-to-one, keeping the source tree layout.
  Bundleless,
}

impl BuildType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Bundle => "bundle",
      Self::Bundleless => "bundleless",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Module format of the emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
  Esm,
  #[default]
  Cjs,
  Umd,
  Iife,
}

impl Format {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Esm => "esm",
      Self::Cjs => "cjs",
      Self::Umd => "umd",
      Self::Iife => "iife",
    }
  }
}

impl fmt::Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

fn default_target() -> String {
  "es6".to_string()
}

fn default_out_dir() -> PathBuf {
  PathBuf::from("dist")
}

/// One fully resolved build output.
///
/// Configs are independent of each other; their identity is their position in
/// the resolved list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
  /// Optional human-readable name used in logs and hook environments.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  #[serde(default)]
  pub build_type: BuildType,

  #[serde(default)]
  pub format: Format,

  /// Language target, e.g. `es2019`.
  #[serde(default = "default_target")]
  pub target: String,

  /// Entry points (bundle) or source roots (bundleless).
  #[serde(default)]
  pub input: Vec<String>,

  #[serde(default = "default_out_dir")]
  pub out_dir: PathBuf,

  #[serde(default)]
  pub source_map: bool,

  /// Emit type declarations for this output.
  #[serde(default)]
  pub dts: bool,

  /// Extra environment passed to command-based collaborators.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub env: BTreeMap<String, String>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      name: None,
      build_type: BuildType::default(),
      format: Format::default(),
      target: default_target(),
      input: Vec::new(),
      out_dir: default_out_dir(),
      source_map: false,
      dts: false,
      env: BTreeMap::new(),
    }
  }
}

impl BuildConfig {
  pub fn new(format: Format) -> Self {
    Self {
      format,
      ..Self::default()
    }
  }

  pub fn with_name(mut self, name: &str) -> Self {
    self.name = Some(name.to_string());
    self
  }

  pub fn with_build_type(mut self, build_type: BuildType) -> Self {
    self.build_type = build_type;
    self
  }

  pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
    self.out_dir = out_dir.into();
    self
  }

  pub fn with_input(mut self, input: &str) -> Self {
    self.input.push(input.to_string());
    self
  }

  /// Name used in logs: the explicit name, or `<build_type>-<format>`.
  pub fn display_name(&self) -> String {
    match &self.name {
      Some(name) => name.clone(),
      None => format!("{}-{}", self.build_type, self.format),
    }
  }
}
