use std::fmt;

/// Operating system variants recognized by oxflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  FreeBsd,
  Windows,
  Cygwin,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    Self::from_identifier(std::env::consts::OS)
  }

  /// Map a `std::env::consts::OS` style identifier to an OS
  pub fn from_identifier(identifier: &str) -> Option<Self> {
    match identifier {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "freebsd" => Some(Self::FreeBsd),
      "windows" => Some(Self::Windows),
      "cygwin" => Some(Self::Cygwin),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::FreeBsd => "freebsd",
      Self::Windows => "windows",
      Self::Cygwin => "cygwin",
    }
  }

  /// Whether scripts on this OS run under the Windows command interpreter
  pub fn is_windows_family(&self) -> bool {
    matches!(self, Self::Windows | Self::Cygwin)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn current_matches_compile_target() {
    if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
      assert!(Os::current().is_some());
    }
  }

  #[test]
  fn macos_uses_darwin_identifier() {
    assert_eq!(Os::MacOs.as_str(), "darwin");
  }

  #[test]
  fn windows_family() {
    assert!(Os::Windows.is_windows_family());
    assert!(Os::Cygwin.is_windows_family());
    assert!(!Os::Linux.is_windows_family());
    assert!(!Os::MacOs.is_windows_family());
  }

  #[test]
  fn unknown_identifier() {
    assert_eq!(Os::from_identifier("haiku"), None);
  }
}
