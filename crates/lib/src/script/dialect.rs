use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::consts::{APP_NAME, VERSION};
use crate::platform::Os;

/// Interpreter targeted by the generated build script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptDialect {
  /// `build_<name>.sh`, run with `sh`, aborts through `set -e`.
  PosixShell,
  /// `build_<name>.bat`, run with `cmd /c`, aborts through `|| exit /b` on every line.
  WindowsBatch,
}

impl ScriptDialect {
  /// Dialect for an operating system; unrecognized systems get the POSIX shell.
  pub fn for_os(os: Option<Os>) -> Self {
    match os {
      Some(os) if os.is_windows_family() => Self::WindowsBatch,
      _ => Self::PosixShell,
    }
  }

  /// Dialect for the host this process runs on.
  pub fn host() -> Self {
    Self::for_os(Os::current())
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::PosixShell => "posix",
      Self::WindowsBatch => "batch",
    }
  }

  /// Script file extension, without the dot.
  pub fn extension(&self) -> &'static str {
    match self {
      Self::PosixShell => "sh",
      Self::WindowsBatch => "bat",
    }
  }

  /// Suffix appended to every build command.
  pub fn fail_stmt(&self) -> &'static str {
    match self {
      Self::PosixShell => "",
      Self::WindowsBatch => " || exit /b",
    }
  }

  pub fn line_ending(&self) -> &'static str {
    match self {
      Self::PosixShell => "\n",
      Self::WindowsBatch => "\r\n",
    }
  }

  /// Generate a comment line for this dialect (without line ending).
  pub fn comment(&self, text: &str) -> String {
    match self {
      Self::PosixShell => format!("# {text}"),
      Self::WindowsBatch => format!("rem {text}"),
    }
  }

  /// Script header: provenance comment plus the dialect's error handling setup.
  ///
  /// The provenance names the generator version and the design's revision.
  pub fn header(&self, revision: &str) -> String {
    let eol = self.line_ending();
    let provenance = self.comment(&format!("Autogenerated by {APP_NAME} {VERSION} / git: {revision}"));
    match self {
      Self::PosixShell => format!("{provenance}{eol}set -e{eol}"),
      Self::WindowsBatch => format!("@echo off{eol}{provenance}{eol}{eol}"),
    }
  }

  /// Interpreter program and the arguments placed before the script path.
  pub fn interpreter(&self) -> (&'static str, &'static [&'static str]) {
    match self {
      Self::PosixShell => ("sh", &[]),
      Self::WindowsBatch => ("cmd", &["/c"]),
    }
  }
}

impl fmt::Display for ScriptDialect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for ScriptDialect {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "posix" | "sh" | "shell" => Ok(Self::PosixShell),
      "batch" | "bat" | "cmd" => Ok(Self::WindowsBatch),
      other => Err(format!("unknown script dialect '{other}' (expected 'posix' or 'batch')")),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn windows_family_gets_batch() {
    assert_eq!(ScriptDialect::for_os(Some(Os::Windows)), ScriptDialect::WindowsBatch);
    assert_eq!(ScriptDialect::for_os(Some(Os::Cygwin)), ScriptDialect::WindowsBatch);
  }

  #[test]
  fn everything_else_gets_posix() {
    assert_eq!(ScriptDialect::for_os(Some(Os::Linux)), ScriptDialect::PosixShell);
    assert_eq!(ScriptDialect::for_os(Some(Os::MacOs)), ScriptDialect::PosixShell);
    assert_eq!(ScriptDialect::for_os(None), ScriptDialect::PosixShell);
  }

  #[test]
  fn host_dialect_matches_target() {
    let expected = if cfg!(windows) {
      ScriptDialect::WindowsBatch
    } else {
      ScriptDialect::PosixShell
    };
    assert_eq!(ScriptDialect::host(), expected);
  }

  #[test]
  fn posix_header() {
    assert_eq!(
      ScriptDialect::PosixShell.header("abc1234"),
      format!("# Autogenerated by oxflow {VERSION} / git: abc1234\nset -e\n")
    );
  }

  #[test]
  fn batch_header() {
    assert_eq!(
      ScriptDialect::WindowsBatch.header("abc1234"),
      format!("@echo off\r\nrem Autogenerated by oxflow {VERSION} / git: abc1234\r\n\r\n")
    );
  }

  #[test]
  fn interpreters() {
    assert_eq!(ScriptDialect::PosixShell.interpreter(), ("sh", &[][..]));
    assert_eq!(ScriptDialect::WindowsBatch.interpreter(), ("cmd", &["/c"][..]));
  }

  #[test]
  fn parse_names() {
    assert_eq!("posix".parse::<ScriptDialect>(), Ok(ScriptDialect::PosixShell));
    assert_eq!("BAT".parse::<ScriptDialect>(), Ok(ScriptDialect::WindowsBatch));
    assert!("fish".parse::<ScriptDialect>().is_err());
  }
}
