//! Host detection.
//!
//! The host operating system decides which interpreter the generated build
//! script targets (see [`crate::script::ScriptDialect`]). Systems oxflow does
//! not recognize get the POSIX shell.

pub mod os;

pub use os::Os;

use crate::script::ScriptDialect;

/// The machine oxflow runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
  /// `None` when the OS is not recognized.
  pub os: Option<Os>,
  /// `std::env::consts::ARCH` style identifier.
  pub arch: &'static str,
  /// Dialect build scripts default to on this host.
  pub dialect: ScriptDialect,
}

impl Host {
  pub fn detect() -> Self {
    Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
  }

  /// Host for an OS/architecture identifier pair.
  pub fn for_target(os: &str, arch: &'static str) -> Self {
    let os = Os::from_identifier(os);
    Self {
      os,
      arch,
      dialect: ScriptDialect::for_os(os),
    }
  }

  pub fn os_name(&self) -> &'static str {
    self.os.map(|os| os.as_str()).unwrap_or("unknown")
  }

  /// `<arch>-<os>`, e.g. `x86_64-linux` or `aarch64-darwin`.
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os_name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn windows_hosts_default_to_batch() {
    let host = Host::for_target("windows", "x86_64");
    assert_eq!(host.dialect, ScriptDialect::WindowsBatch);
    assert_eq!(host.triple(), "x86_64-windows");
  }

  #[test]
  fn macos_reports_darwin() {
    let host = Host::for_target("macos", "aarch64");
    assert_eq!(host.dialect, ScriptDialect::PosixShell);
    assert_eq!(host.triple(), "aarch64-darwin");
  }

  #[test]
  fn unknown_os_falls_back_to_posix() {
    let host = Host::for_target("haiku", "riscv64");
    assert_eq!(host.os, None);
    assert_eq!(host.dialect, ScriptDialect::PosixShell);
    assert_eq!(host.triple(), "riscv64-unknown");
  }

  #[test]
  fn detected_dialect_matches_script_default() {
    assert_eq!(Host::detect().dialect, ScriptDialect::host());
  }
}
