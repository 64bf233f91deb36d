//! Artifact file names derived from a build name.
//!
//! Every stage finds its inputs by name alone, so the full set of names is a
//! pure function of the build name and the script dialect.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::script::ScriptDialect;

/// File names produced by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildArtifacts {
  pub build_name: String,
  /// Synthesizer control script.
  pub synthesis_script: String,
  /// Synthesizer log.
  pub synthesis_report: String,
  /// Pin/clock constraints.
  pub constraints: String,
  /// Netlist handed from synthesis to place-and-route.
  pub netlist: String,
  /// Bitstream-assembly intermediate.
  pub fasm: String,
  /// Final bitstream.
  pub bitstream: String,
  /// Driver script that runs the whole pipeline.
  pub build_script: String,
}

impl BuildArtifacts {
  pub fn new(build_name: &str, dialect: ScriptDialect) -> Self {
    Self {
      build_name: build_name.to_string(),
      synthesis_script: format!("{build_name}.ys"),
      synthesis_report: format!("{build_name}.rpt"),
      constraints: format!("{build_name}.pdc"),
      netlist: format!("{build_name}.json"),
      fasm: format!("{build_name}.fasm"),
      bitstream: format!("{build_name}.bit"),
      build_script: format!("build_{build_name}.{}", dialect.extension()),
    }
  }

  /// All artifact file names.
  pub fn file_names(&self) -> [&str; 7] {
    [
      self.synthesis_script.as_str(),
      self.synthesis_report.as_str(),
      self.constraints.as_str(),
      self.netlist.as_str(),
      self.fasm.as_str(),
      self.bitstream.as_str(),
      self.build_script.as_str(),
    ]
  }

  /// All artifact paths inside `dir`.
  pub fn paths_in(&self, dir: &Path) -> Vec<PathBuf> {
    self.file_names().iter().map(|name| dir.join(name)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn names_follow_build_name() {
    let artifacts = BuildArtifacts::new("blinky", ScriptDialect::PosixShell);
    assert_eq!(artifacts.synthesis_script, "blinky.ys");
    assert_eq!(artifacts.synthesis_report, "blinky.rpt");
    assert_eq!(artifacts.constraints, "blinky.pdc");
    assert_eq!(artifacts.netlist, "blinky.json");
    assert_eq!(artifacts.fasm, "blinky.fasm");
    assert_eq!(artifacts.bitstream, "blinky.bit");
    assert_eq!(artifacts.build_script, "build_blinky.sh");
  }

  #[test]
  fn batch_script_extension() {
    let artifacts = BuildArtifacts::new("blinky", ScriptDialect::WindowsBatch);
    assert_eq!(artifacts.build_script, "build_blinky.bat");
  }

  #[test]
  fn distinct_build_names_do_not_collide() {
    let dir = Path::new("build");
    for dialect in [ScriptDialect::PosixShell, ScriptDialect::WindowsBatch] {
      let a: HashSet<_> = BuildArtifacts::new("soc_a", dialect).paths_in(dir).into_iter().collect();
      let b: HashSet<_> = BuildArtifacts::new("soc_b", dialect).paths_in(dir).into_iter().collect();
      assert_eq!(a.len(), 7);
      assert!(a.is_disjoint(&b));
    }
  }
}
