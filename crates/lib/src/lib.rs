//! modbuild-lib: build-task orchestration for module builds
//!
//! This crate decides how a module build runs and coordinates it:
//! - `Orchestrator`: picks the platform or module path and sequences hooks
//! - `for_each`: bounded-concurrency mapping with first-failure cancellation
//! - `BuildHooks`, `TaskExecutor`, `PlatformStrategy`: injected collaborators
//! - `ProjectConfig`: the resolved build configs loaded from `modbuild.toml`

pub mod config;
pub mod execute;
pub mod hooks;
pub mod options;

pub use config::{BuildConfig, BuildType, Format, ProjectConfig};
pub use execute::{BuildError, BuildStatus, BuildSummary, ExecuteConfig, Orchestrator};
pub use hooks::BuildHooks;
pub use options::{BuildOptions, PlatformSelector};
