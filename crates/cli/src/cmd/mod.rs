mod build;
mod info;

pub use build::{BuildArgs, cmd_build};
pub use info::cmd_info;
