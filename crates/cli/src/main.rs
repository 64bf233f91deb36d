mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oxflow_lib::consts::DEFAULT_BUILD_DIR;
use oxflow_lib::options::OptionOverrides;
use oxflow_lib::script::ScriptDialect;

use crate::output::OutputFormat;

/// oxflow - Bitstream builds for Lattice Nexus FPGAs
#[derive(Parser)]
#[command(name = "oxflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the build scripts and run the toolchain
  Build {
    #[command(flatten)]
    target: TargetArgs,

    /// Directory all artifacts are written into
    #[arg(long, default_value = DEFAULT_BUILD_DIR)]
    build_dir: PathBuf,

    /// Write the scripts without running them
    #[arg(long)]
    no_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Print the build script without writing or running anything
  Script {
    #[command(flatten)]
    target: TargetArgs,

    /// Print the synthesis script instead of the build script
    #[arg(long)]
    synthesis: bool,
  },

  /// Check that the toolchain is installed
  Check {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show host and toolchain information
  Info {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

/// What to build, shared by `build` and `script`.
#[derive(Args)]
pub struct TargetArgs {
  /// Path to the design file
  #[arg(default_value = "design.lua")]
  pub design: PathBuf,

  /// Build name (default: the design name, else `top`)
  #[arg(long)]
  pub build_name: Option<String>,

  /// Script dialect (default: from the host OS)
  #[arg(long)]
  pub dialect: Option<ScriptDialect>,

  #[command(flatten)]
  pub toolchain: ToolchainArgs,
}

/// Toolchain switches layered over the design's `toolchain` table.
///
/// Switches can only turn an option on; an option the design enables stays
/// enabled. `--nextpnr-seed` replaces the design's seed.
#[derive(Args)]
#[command(next_help_heading = "Toolchain (switches enable options, they cannot disable ones set by the design)")]
pub struct ToolchainArgs {
  /// Disable wide-LUT inference in Yosys
  #[arg(long)]
  pub yosys_nowidelut: bool,

  /// Use Yosys' ABC9 backend
  #[arg(long)]
  pub yosys_abc9: bool,

  /// Fail place-and-route when timing is not met; a design with `timingstrict = true` stays strict
  #[arg(long)]
  pub nextpnr_timingstrict: bool,

  /// Ignore combinational loops in timing analysis
  #[arg(long)]
  pub nextpnr_ignoreloops: bool,

  /// Place-and-route seed
  #[arg(long, value_name = "N")]
  pub nextpnr_seed: Option<u64>,

  /// Target the engineering-sample device variant
  #[arg(long)]
  pub nexus_es_device: bool,
}

impl ToolchainArgs {
  pub fn overrides(&self) -> OptionOverrides {
    OptionOverrides {
      nowidelut: self.yosys_nowidelut,
      abc9: self.yosys_abc9,
      timing_strict: self.nextpnr_timingstrict,
      ignore_loops: self.nextpnr_ignoreloops,
      seed: self.nextpnr_seed,
      es_device: self.nexus_es_device,
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build {
      target,
      build_dir,
      no_run,
      format,
    } => cmd::cmd_build(&target, build_dir, !no_run, format),
    Commands::Script { target, synthesis } => cmd::cmd_script(&target, synthesis),
    Commands::Check { format } => cmd::cmd_check(format),
    Commands::Info { format } => cmd::cmd_info(format),
  }
}
