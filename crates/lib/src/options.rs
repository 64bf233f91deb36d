//! Build-time toolchain options.
//!
//! `BuildOptions` is resolved once per build, before any template is rendered,
//! and is passed by reference into every later stage. It is never mutated after
//! resolution.
//!
//! Options are layered:
//! 1. built-in defaults (`BuildOptions::default()`)
//! 2. the design file's `toolchain` table
//! 3. command-line overrides (`OptionOverrides`)

use serde::{Deserialize, Serialize};

/// Synthesizer flag that disables wide-LUT inference.
pub const NOWIDELUT_FLAG: &str = "-nowidelut";

/// Synthesizer flag that selects the ABC9 logic-optimization backend.
pub const ABC9_FLAG: &str = "-abc9";

/// Place-and-route flag that downgrades unmet timing to a warning.
pub const TIMING_ALLOW_FAIL_FLAG: &str = "--timing-allow-fail";

/// Place-and-route flag that ignores combinational loops during timing analysis.
pub const IGNORE_LOOPS_FLAG: &str = "--ignore-loops";

/// Suffix appended to the device name for engineering-sample silicon.
pub const ES_DEVICE_SUFFIX: &str = "ES";

/// Immutable toolchain configuration for a single build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
  /// Disable wide-LUT inference in synthesis.
  pub nowidelut: bool,

  /// Use the ABC9 optimization backend in synthesis.
  pub abc9: bool,

  /// Fail place-and-route when timing is not met.
  #[serde(alias = "timingstrict")]
  pub timing_strict: bool,

  /// Ignore combinational loops in timing analysis.
  #[serde(alias = "ignoreloops")]
  pub ignore_loops: bool,

  /// Place-and-route seed.
  pub seed: u64,

  /// Target the engineering-sample variant of the device.
  #[serde(alias = "esDevice")]
  pub es_device: bool,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      nowidelut: false,
      abc9: false,
      timing_strict: false,
      ignore_loops: false,
      seed: 1,
      es_device: false,
    }
  }
}

impl BuildOptions {
  /// Apply command-line overrides on top of these options.
  ///
  /// Boolean overrides can only switch an option on; an unset override keeps
  /// the existing value.
  pub fn with_overrides(self, overrides: &OptionOverrides) -> Self {
    Self {
      nowidelut: self.nowidelut || overrides.nowidelut,
      abc9: self.abc9 || overrides.abc9,
      timing_strict: self.timing_strict || overrides.timing_strict,
      ignore_loops: self.ignore_loops || overrides.ignore_loops,
      seed: overrides.seed.unwrap_or(self.seed),
      es_device: self.es_device || overrides.es_device,
    }
  }

  /// Wide-LUT flag fragment for the synthesis template.
  pub fn nowidelut_arg(&self) -> &'static str {
    if self.nowidelut { NOWIDELUT_FLAG } else { "" }
  }

  /// ABC9 flag fragment for the synthesis template.
  pub fn abc9_arg(&self) -> &'static str {
    if self.abc9 { ABC9_FLAG } else { "" }
  }

  /// Timing-relaxation flag fragment; present unless timing is strict.
  pub fn timing_arg(&self) -> &'static str {
    if self.timing_strict { "" } else { TIMING_ALLOW_FAIL_FLAG }
  }

  /// Loop-ignoring flag fragment for place-and-route.
  pub fn ignore_loops_arg(&self) -> &'static str {
    if self.ignore_loops { IGNORE_LOOPS_FLAG } else { "" }
  }

  /// Device identifier passed to place-and-route.
  pub fn device_name(&self, device: &str) -> String {
    if self.es_device {
      format!("{device}{ES_DEVICE_SUFFIX}")
    } else {
      device.to_string()
    }
  }
}

/// Command-line overrides for `BuildOptions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
  pub nowidelut: bool,
  pub abc9: bool,
  pub timing_strict: bool,
  pub ignore_loops: bool,
  pub seed: Option<u64>,
  pub es_device: bool,
}
