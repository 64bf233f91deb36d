//! Platform description consumed by the toolchain.
//!
//! A `Design` lists the HDL sources to synthesize, the target device, and the
//! pin and clock constraints for place-and-route. It is normally loaded from a
//! Lua file (see [`lua::load_design`]).

pub mod lua;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::options::BuildOptions;

pub use lua::{DesignError, load_design};

/// HDL dialect of a source file.
///
/// Unknown dialect names are kept verbatim so they can be forwarded to the
/// synthesizer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
  Verilog,
  SystemVerilog,
  Vhdl,
  Other(String),
}

impl Language {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Verilog => "verilog",
      Self::SystemVerilog => "systemverilog",
      Self::Vhdl => "vhdl",
      Self::Other(name) => name,
    }
  }

  pub fn is_known(&self) -> bool {
    !matches!(self, Self::Other(_))
  }
}

impl From<String> for Language {
  fn from(name: String) -> Self {
    match name.as_str() {
      "verilog" => Self::Verilog,
      "systemverilog" => Self::SystemVerilog,
      "vhdl" => Self::Vhdl,
      _ => Self::Other(name),
    }
  }
}

impl From<&str> for Language {
  fn from(name: &str) -> Self {
    Self::from(name.to_string())
  }
}

impl From<Language> for String {
  fn from(language: Language) -> Self {
    language.as_str().to_string()
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

fn default_library() -> String {
  "work".to_string()
}

/// A registered HDL source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
  pub path: PathBuf,

  pub language: Language,

  #[serde(default = "default_library")]
  pub library: String,

  /// Copy the file into the build directory and read it from there.
  #[serde(default)]
  pub copy: bool,
}

impl SourceFile {
  pub fn new(path: impl Into<PathBuf>, language: impl Into<Language>) -> Self {
    Self {
      path: path.into(),
      language: language.into(),
      library: default_library(),
      copy: false,
    }
  }
}

/// Pin assignment for a top-level signal.
///
/// A signal with more than one pin is a bus; pin `i` is bound to `signal[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoConstraint {
  pub signal: String,
  pub pins: Vec<String>,
  #[serde(default)]
  pub io_standard: Option<String>,
  /// Extra `IO_TYPE`-style attributes, emitted verbatim.
  #[serde(default)]
  pub misc: Vec<String>,
}

/// Clock period constraint on a net.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockConstraint {
  pub net: String,
  pub period_ns: f64,
}

/// A complete platform description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
  /// Top-level module name; also the default build name.
  #[serde(default)]
  pub name: Option<String>,

  /// Target device identifier (e.g. `LIFCL-40-9BG400C`).
  pub device: String,

  /// Sources in registration order.
  #[serde(default)]
  pub sources: Vec<SourceFile>,

  #[serde(default)]
  pub include_paths: Vec<PathBuf>,

  #[serde(default)]
  pub ios: Vec<IoConstraint>,

  /// Raw constraint commands appended after the pin constraints.
  #[serde(default)]
  pub platform_commands: Vec<String>,

  #[serde(default)]
  pub clocks: Vec<ClockConstraint>,

  /// Toolchain defaults declared by the design.
  #[serde(default)]
  pub toolchain: Option<BuildOptions>,
}

impl Design {
  /// Toolchain options declared by the design, or the built-in defaults.
  pub fn options(&self) -> BuildOptions {
    self.toolchain.unwrap_or_default()
  }
}
