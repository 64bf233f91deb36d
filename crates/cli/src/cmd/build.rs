//! Implementation of the `oxflow build` command.
//!
//! Loads the design, writes every script into the build directory and, unless
//! `--no-run` is given, verifies the toolchain and runs the build script.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use oxflow_lib::build::{BuildOutcome, Toolchain};

use super::prepare;
use crate::TargetArgs;
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

pub fn cmd_build(target: &TargetArgs, build_dir: PathBuf, run: bool, format: OutputFormat) -> Result<()> {
  let (design, mut request, revision) = prepare(target, run)?;
  request.build_dir = build_dir;
  let toolchain = Toolchain::new(revision);

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt.block_on(toolchain.build(&design, &request)).context("Build failed")?;

  if format.is_json() {
    print_json(&outcome)?;
  } else {
    print_summary(&outcome, format_duration(started.elapsed()));
  }

  Ok(())
}

fn print_summary(outcome: &BuildOutcome, elapsed: String) {
  let artifacts = &outcome.artifacts;
  if outcome.ran() {
    print_success(&format!("Built {} in {}", artifacts.bitstream, elapsed));
  } else {
    print_info(&format!("Scripts written for {}", artifacts.build_name));
  }
  print_stat("Build dir", &outcome.build_dir.display().to_string());
  print_stat("Build script", &artifacts.build_script);
  print_stat("Synthesis script", &artifacts.synthesis_script);
  print_stat("Constraints", &format!("{} ({})", artifacts.constraints, outcome.constraints_format));
  print_stat("Stage", outcome.stage().as_str());

  let present: Vec<String> = artifacts
    .paths_in(&outcome.build_dir)
    .iter()
    .filter(|path| path.exists())
    .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
    .collect();
  print_stat("Artifacts", &present.join(", "));
}
