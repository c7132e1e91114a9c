use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use modbuild_lib::config::DEFAULT_CONFIG_FILE;

mod cmd;
mod output;

use cmd::BuildArgs;
use output::OutputFormat;

/// modbuild - run module build tasks with lifecycle hooks
#[derive(Parser)]
#[command(name = "modbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Log level filter (RUST_LOG takes precedence)
  #[arg(long, global = true, value_name = "LEVEL")]
  log_level: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every configured target, or the platform build with --platform
  Build {
    /// Path to the project file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Run the platform build instead; without names, every platform
    #[arg(long, num_args = 0.., value_name = "NAME")]
    platform: Option<Vec<String>>,

    /// Maximum number of build tasks in flight
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Path to the tsconfig passed to build tasks, relative to the project file's directory
    #[arg(long, default_value = "./tsconfig.json")]
    tsconfig: PathBuf,

    /// Skip type declaration output
    #[arg(long)]
    no_dts: bool,

    /// Keep existing output directories
    #[arg(long)]
    no_clear: bool,

    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Show the resolved build configs without building
  Info {
    /// Path to the project file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
  },
}

fn init_logging(verbose: bool, log_level: Option<&str>) {
  let level = log_level.unwrap_or(if verbose { "debug" } else { "info" });
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("modbuild={},modbuild_lib={}", level, level)));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Build {
      config,
      platform,
      concurrency,
      tsconfig,
      no_dts,
      no_clear,
      output,
    } => cmd::cmd_build(BuildArgs {
      config,
      platform,
      concurrency,
      tsconfig,
      dts: !no_dts,
      clear: !no_clear,
      output,
    }),
    Commands::Info { config, output } => cmd::cmd_info(&config, output),
  }
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose, cli.log_level.as_deref());

  if let Err(e) = run(cli) {
    output::print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}
