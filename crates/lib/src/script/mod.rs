//! Script materialization.
//!
//! Turns the command templates into the two files a build runs from:
//! - `<build_name>.ys`, the synthesizer control script
//! - `build_<build_name>.sh` / `.bat`, the driver script for the whole pipeline
//!
//! Both dialects share one rendering path: every build command receives the
//! dialect's fail statement, which is empty for the POSIX shell (its header
//! sets `set -e`) and ` || exit /b` for batch files.

mod dialect;

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

pub use dialect::ScriptDialect;

use crate::artifacts::BuildArtifacts;
use crate::options::BuildOptions;
use crate::template::{Params, TemplateError};
use crate::templates::{BUILD_TEMPLATE, FAIL_STMT_SUFFIX, SYNTHESIS_TEMPLATE};

/// A fully substituted script, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
  /// File name relative to the build directory.
  pub file_name: String,
  /// Interpreter the script targets.
  pub dialect: ScriptDialect,
  /// Text written before the first line.
  pub header: String,
  /// Rendered lines, without line endings.
  pub lines: Vec<String>,
  /// Line terminator written after every line.
  pub line_ending: &'static str,
}

impl RenderedScript {
  /// Exact file contents.
  pub fn contents(&self) -> String {
    let mut contents = self.header.clone();
    for line in &self.lines {
      contents.push_str(line);
      contents.push_str(self.line_ending);
    }
    contents
  }

  /// Write the script into `dir`, byte for byte, and return its path.
  pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(&self.file_name);
    std::fs::write(&path, self.contents().as_bytes())?;
    debug!(path = %path.display(), dialect = %self.dialect, lines = self.lines.len(), "script written");
    Ok(path)
  }
}

/// Inputs to the build driver script besides the options.
#[derive(Debug, Clone, Copy)]
pub struct BuildScriptInputs<'a> {
  pub build_name: &'a str,
  /// Device identifier before the engineering-sample suffix.
  pub device: &'a str,
  /// Constraint file name produced by the constraint emitter.
  pub constraint_file: &'a str,
  /// Revision shown in the header comment.
  pub revision: &'a str,
}

/// Render the synthesizer control script.
///
/// `read_files` is the importer output, embedded as-is.
pub fn render_synthesis_script(
  build_name: &str,
  read_files: &str,
  options: &BuildOptions,
  dialect: ScriptDialect,
) -> Result<RenderedScript, TemplateError> {
  let params = Params::new()
    .with("build_name", build_name)
    .with("nwl", options.nowidelut_arg())
    .with("abc", options.abc9_arg())
    .with("read_files", read_files);

  Ok(RenderedScript {
    file_name: BuildArtifacts::new(build_name, dialect).synthesis_script,
    dialect,
    header: String::new(),
    lines: SYNTHESIS_TEMPLATE.render(&params)?,
    // read by the synthesizer on every host
    line_ending: "\n",
  })
}

/// Render the build driver script.
pub fn render_build_script(
  inputs: &BuildScriptInputs<'_>,
  options: &BuildOptions,
  dialect: ScriptDialect,
) -> Result<RenderedScript, TemplateError> {
  let params = Params::new()
    .with("build_name", inputs.build_name)
    .with("constraint_file", inputs.constraint_file)
    .with("device", options.device_name(inputs.device))
    .with("timefailarg", options.timing_arg())
    .with("ignoreloops", options.ignore_loops_arg())
    .with("seed", options.seed)
    .with("fail_stmt", dialect.fail_stmt());

  Ok(RenderedScript {
    file_name: BuildArtifacts::new(inputs.build_name, dialect).build_script,
    dialect,
    header: dialect.header(inputs.revision),
    lines: BUILD_TEMPLATE.render_with_suffix(FAIL_STMT_SUFFIX, &params)?,
    line_ending: dialect.line_ending(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::options::{ABC9_FLAG, IGNORE_LOOPS_FLAG, NOWIDELUT_FLAG, TIMING_ALLOW_FAIL_FLAG};
  use tempfile::TempDir;

  const READS: &str = "read_verilog a.v\nread_verilog -sv b.sv";

  fn inputs() -> BuildScriptInputs<'static> {
    BuildScriptInputs {
      build_name: "blinky",
      device: "LIFCL-40-9BG400C",
      constraint_file: "blinky.pdc",
      revision: "abc1234",
    }
  }

  fn all_option_combinations() -> Vec<BuildOptions> {
    (0..64u32)
      .map(|bits| BuildOptions {
        nowidelut: bits & 1 != 0,
        abc9: bits & 2 != 0,
        timing_strict: bits & 4 != 0,
        ignore_loops: bits & 8 != 0,
        seed: u64::from(bits),
        es_device: bits & 32 != 0,
      })
      .collect()
  }

  fn synth_command(script: &RenderedScript) -> &str {
    script.lines.iter().find(|l| l.starts_with("synth_nexus")).unwrap()
  }

  fn pnr_command(script: &RenderedScript) -> &str {
    script.lines.iter().find(|l| l.starts_with("nextpnr-nexus")).unwrap()
  }

  #[test]
  fn synthesis_script_layout() {
    let script = render_synthesis_script("blinky", READS, &BuildOptions::default(), ScriptDialect::PosixShell).unwrap();

    assert_eq!(script.file_name, "blinky.ys");
    assert_eq!(
      script.contents(),
      "verilog_defaults -push\n\
       verilog_defaults -add -defer\n\
       read_verilog a.v\n\
       read_verilog -sv b.sv\n\
       verilog_defaults -pop\n\
       attrmap -tocase keep -imap keep=\"true\" keep=1 -imap keep=\"false\" keep=0 -remove keep=0\n\
       synth_nexus -flatten   -json blinky.json -top blinky\n"
    );
  }

  #[test]
  fn no_placeholder_survives_any_option_combination() {
    for options in all_option_combinations() {
      for dialect in [ScriptDialect::PosixShell, ScriptDialect::WindowsBatch] {
        let synth = render_synthesis_script("blinky", READS, &options, dialect).unwrap();
        let build = render_build_script(&inputs(), &options, dialect).unwrap();
        for text in [synth.contents(), build.contents()] {
          assert!(!text.contains('{') && !text.contains('}'), "unsubstituted text in {text}");
        }
      }
    }
  }

  #[test]
  fn synthesis_flags_off() {
    let script = render_synthesis_script("blinky", READS, &BuildOptions::default(), ScriptDialect::PosixShell).unwrap();
    let command = synth_command(&script);
    assert!(!command.contains(NOWIDELUT_FLAG));
    assert!(!command.contains(ABC9_FLAG));
  }

  #[test]
  fn synthesis_flags_on_exactly_once() {
    let options = BuildOptions {
      nowidelut: true,
      abc9: true,
      ..Default::default()
    };
    let script = render_synthesis_script("blinky", READS, &options, ScriptDialect::PosixShell).unwrap();
    let command = synth_command(&script);
    assert_eq!(command.matches(NOWIDELUT_FLAG).count(), 1);
    assert_eq!(command.matches(ABC9_FLAG).count(), 1);
    assert_eq!(command, "synth_nexus -flatten -nowidelut -abc9 -json blinky.json -top blinky");
  }

  #[test]
  fn timing_strict_drops_relaxation_flag() {
    let strict = BuildOptions {
      timing_strict: true,
      ..Default::default()
    };
    let relaxed = BuildOptions::default();

    let strict_script = render_build_script(&inputs(), &strict, ScriptDialect::PosixShell).unwrap();
    let relaxed_script = render_build_script(&inputs(), &relaxed, ScriptDialect::PosixShell).unwrap();

    assert!(!pnr_command(&strict_script).contains(TIMING_ALLOW_FAIL_FLAG));
    assert!(pnr_command(&relaxed_script).contains(TIMING_ALLOW_FAIL_FLAG));
  }

  #[test]
  fn build_commands_carry_device_seed_and_constraints() {
    let options = BuildOptions {
      ignore_loops: true,
      es_device: true,
      seed: 42,
      ..Default::default()
    };
    let script = render_build_script(&inputs(), &options, ScriptDialect::PosixShell).unwrap();

    assert_eq!(
      script.lines,
      vec![
        "yosys -l blinky.rpt blinky.ys",
        "nextpnr-nexus --json blinky.json --pdc blinky.pdc --fasm blinky.fasm --device LIFCL-40-9BG400CES --timing-allow-fail --ignore-loops --seed 42",
        "prjoxide pack blinky.fasm blinky.bit",
      ]
    );
    assert!(pnr_command(&script).contains(IGNORE_LOOPS_FLAG));
  }

  #[test]
  fn batch_lines_all_fail_fast() {
    let script = render_build_script(&inputs(), &BuildOptions::default(), ScriptDialect::WindowsBatch).unwrap();

    assert_eq!(script.file_name, "build_blinky.bat");
    assert_eq!(script.lines.len(), 3);
    assert!(script.lines.iter().all(|l| l.ends_with(" || exit /b")));
    let header = format!("@echo off\r\nrem Autogenerated by oxflow {} / git: abc1234\r\n", crate::consts::VERSION);
    assert!(script.contents().starts_with(&header));
  }

  #[test]
  fn posix_lines_rely_on_set_e() {
    let script = render_build_script(&inputs(), &BuildOptions::default(), ScriptDialect::PosixShell).unwrap();

    assert_eq!(script.file_name, "build_blinky.sh");
    assert!(script.lines.iter().all(|l| !l.contains("exit /b")));
    assert!(script.header.lines().any(|l| l == "set -e"));
  }

  #[test]
  fn batch_script_written_byte_exact() {
    let temp = TempDir::new().unwrap();
    let script = render_build_script(&inputs(), &BuildOptions::default(), ScriptDialect::WindowsBatch).unwrap();

    let path = script.write_to(temp.path()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, script.contents().into_bytes());
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.matches("\r\n").count(), text.matches('\n').count());
  }
}
