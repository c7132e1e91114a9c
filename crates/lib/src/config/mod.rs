//! Build configuration.
//!
//! - [`BuildConfig`]: one resolved build output
//! - [`ProjectConfig`]: the `modbuild.toml` project file holding the resolved
//!   build configs and the commands used to build them

mod project;
mod types;

pub use project::{ConfigError, DEFAULT_CONFIG_FILE, ProjectConfig, TaskCommand};
pub use types::*;
