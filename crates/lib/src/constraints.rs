//! Pin and clock constraint emission.
//!
//! The build template only needs the name of the constraint file, so emission
//! sits behind a single call on [`ConstraintEmitter`].

use std::io;
use std::path::Path;

use tracing::debug;

use crate::design::{ClockConstraint, Design, IoConstraint};

/// Constraint file written by an emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedConstraints {
  /// File name relative to the build directory.
  pub file_name: String,
  /// Format label (e.g. `PDC`).
  pub format: &'static str,
}

/// Writes a constraint file for a design into a build directory.
pub trait ConstraintEmitter {
  fn emit(&self, design: &Design, build_name: &str, dir: &Path) -> io::Result<EmittedConstraints>;
}

/// Emits Lattice `.pdc` constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdcEmitter;

impl ConstraintEmitter for PdcEmitter {
  fn emit(&self, design: &Design, build_name: &str, dir: &Path) -> io::Result<EmittedConstraints> {
    let file_name = format!("{build_name}.pdc");
    let content = format_pdc(design);
    std::fs::write(dir.join(&file_name), content)?;

    debug!(file = %file_name, ios = design.ios.len(), clocks = design.clocks.len(), "constraints written");

    Ok(EmittedConstraints {
      file_name,
      format: "PDC",
    })
  }
}

/// Format all pin, platform and clock constraints of a design.
pub fn format_pdc(design: &Design) -> String {
  let mut blocks: Vec<String> = Vec::new();

  for io in &design.ios {
    for (signal, pin) in flatten(io) {
      blocks.push(format_io(&signal, pin, io));
    }
  }

  if !design.platform_commands.is_empty() {
    blocks.push(design.platform_commands.join("\n\n"));
  }

  for clock in &design.clocks {
    blocks.push(format_clock(clock));
  }

  if blocks.is_empty() {
    return String::new();
  }
  let mut pdc = blocks.join("\n");
  pdc.push('\n');
  pdc
}

/// Bus signals are bound pin by pin as `signal[i]`.
fn flatten(io: &IoConstraint) -> Vec<(String, &str)> {
  if io.pins.len() > 1 {
    io.pins
      .iter()
      .enumerate()
      .map(|(i, pin)| (format!("{}[{}]", io.signal, i), pin.as_str()))
      .collect()
  } else {
    io.pins.iter().map(|pin| (io.signal.clone(), pin.as_str())).collect()
  }
}

fn format_io(signal: &str, pin: &str, io: &IoConstraint) -> String {
  let mut lines = vec![format!("ldc_set_location -site {{{pin}}} [get_ports {signal}]")];
  if let Some(standard) = &io.io_standard {
    lines.push(format!("ldc_set_port -iobuf {{IO_TYPE={standard}}} [get_ports {signal}]"));
  }
  for misc in &io.misc {
    lines.push(format!("ldc_set_port -iobuf {{{misc}}} [get_ports {signal}]"));
  }
  lines.join("\n")
}

fn format_clock(clock: &ClockConstraint) -> String {
  format!(
    "create_clock -period {:?} -name {} [get_nets {}]",
    clock.period_ns, clock.net, clock.net
  )
}
