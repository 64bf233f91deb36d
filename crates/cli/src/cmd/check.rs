//! Implementation of the `oxflow check` command.

use anyhow::{Result, bail};

use oxflow_lib::consts::{PACKER, REQUIRED_TOOLS};
use oxflow_lib::runner::{PathProbe, probe_tools};

use crate::output::{OutputFormat, print_error, print_json, print_success, print_warning};

pub fn cmd_check(format: OutputFormat) -> Result<()> {
  let mut tools = REQUIRED_TOOLS.to_vec();
  tools.push(PACKER);
  let statuses = probe_tools(&PathProbe::new(), &tools);

  if format.is_json() {
    print_json(&statuses)?;
  } else {
    for status in &statuses {
      match &status.path {
        Some(path) => print_success(&format!("{}: {}", status.tool, path.display())),
        None if REQUIRED_TOOLS.contains(&status.tool.as_str()) => print_error(&format!("{}: not found", status.tool)),
        None => print_warning(&format!("{}: not found", status.tool)),
      }
    }
  }

  let missing: Vec<_> = statuses
    .iter()
    .filter(|s| s.path.is_none() && REQUIRED_TOOLS.contains(&s.tool.as_str()))
    .map(|s| s.tool.as_str())
    .collect();
  if !missing.is_empty() {
    bail!("Missing required tools: {}", missing.join(", "));
  }

  Ok(())
}
