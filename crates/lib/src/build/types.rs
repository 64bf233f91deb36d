//! Types for build orchestration.
//!
//! This module defines the build request, the per-build stage machine, the
//! build outcome, and the error type that every stage failure is reported
//! through.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::artifacts::BuildArtifacts;
use crate::consts::{DEFAULT_BUILD_DIR, DEFAULT_BUILD_NAME};
use crate::design::Design;
use crate::options::BuildOptions;
use crate::runner::{MissingTools, RunError};
use crate::script::{RenderedScript, ScriptDialect};
use crate::template::TemplateError;

/// Errors that can end a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A template placeholder had no value.
  #[error("template error: {0}")]
  Template(#[from] TemplateError),

  /// Tool lookup, process spawn, or non-zero exit.
  #[error(transparent)]
  Run(#[from] RunError),

  #[error("failed to create build directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy source {} into the build directory: {source}", path.display())]
  CopySource { path: PathBuf, source: io::Error },

  #[error("failed to write constraints: {0}")]
  Constraints(#[source] io::Error),

  #[error("failed to write {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },
}

impl From<MissingTools> for BuildError {
  fn from(missing: MissingTools) -> Self {
    Self::Run(RunError::MissingTools(missing))
  }
}

/// A build that ended in [`BuildStage::Failed`].
#[derive(Debug, Error)]
#[error("build failed during {}", self.failed_during())]
pub struct BuildFailure {
  /// Every stage entered, in order, ending with `Failed`.
  pub stages: Vec<BuildStage>,
  #[source]
  pub error: BuildError,
}

impl BuildFailure {
  /// The stage that was in progress when the build failed.
  pub fn failed_during(&self) -> BuildStage {
    self
      .stages
      .iter()
      .rev()
      .copied()
      .find(|stage| *stage != BuildStage::Failed)
      .unwrap_or(BuildStage::Configured)
  }

  pub fn kind(&self) -> ErrorKind {
    self.error.kind()
  }
}

/// Broad classification of a build failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Missing template value; a wiring bug, not an operator problem.
  Configuration,
  /// Required tools are not installed or not on the search path.
  Environment,
  /// An external tool ran and failed.
  Execution,
  /// Reading or writing build files failed.
  Io,
}

impl BuildError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Template(_) => ErrorKind::Configuration,
      Self::Run(RunError::MissingTools(_)) => ErrorKind::Environment,
      Self::Run(RunError::Spawn { .. } | RunError::ScriptFailed { .. }) => ErrorKind::Execution,
      Self::CreateDir { .. } | Self::CopySource { .. } | Self::Constraints(_) | Self::WriteFile { .. } => {
        ErrorKind::Io
      }
    }
  }
}

/// Stages a build moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
  Configured,
  SourcesImported,
  ScriptRendered,
  ScriptWritten,
  ToolsVerified,
  Running,
  Succeeded,
  Failed,
}

impl BuildStage {
  /// The stage that follows this one on success; `None` once terminal.
  pub fn next(self) -> Option<Self> {
    match self {
      Self::Configured => Some(Self::SourcesImported),
      Self::SourcesImported => Some(Self::ScriptRendered),
      Self::ScriptRendered => Some(Self::ScriptWritten),
      Self::ScriptWritten => Some(Self::ToolsVerified),
      Self::ToolsVerified => Some(Self::Running),
      Self::Running => Some(Self::Succeeded),
      Self::Succeeded | Self::Failed => None,
    }
  }

  pub fn is_terminal(self) -> bool {
    self.next().is_none()
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Configured => "configured",
      Self::SourcesImported => "sources_imported",
      Self::ScriptRendered => "script_rendered",
      Self::ScriptWritten => "script_written",
      Self::ToolsVerified => "tools_verified",
      Self::Running => "running",
      Self::Succeeded => "succeeded",
      Self::Failed => "failed",
    }
  }
}

impl fmt::Display for BuildStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// What to build and how.
#[derive(Debug, Clone)]
pub struct BuildRequest {
  /// Directory all artifacts are written into.
  pub build_dir: PathBuf,
  /// Build name; falls back to the design name, then `top`.
  pub build_name: Option<String>,
  /// Resolved toolchain options.
  pub options: BuildOptions,
  /// Interpreter the driver script targets.
  pub dialect: ScriptDialect,
  /// Run the driver script after writing it.
  pub run: bool,
}

impl Default for BuildRequest {
  fn default() -> Self {
    Self {
      build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
      build_name: None,
      options: BuildOptions::default(),
      dialect: ScriptDialect::host(),
      run: true,
    }
  }
}

impl BuildRequest {
  /// Build name for `design`.
  pub fn resolve_build_name(&self, design: &Design) -> String {
    self
      .build_name
      .clone()
      .or_else(|| design.name.clone())
      .unwrap_or_else(|| DEFAULT_BUILD_NAME.to_string())
  }
}

/// Both scripts of a build, rendered but not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBuild {
  pub synthesis: RenderedScript,
  pub build: RenderedScript,
}

/// Result of a completed build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
  /// Canonical build directory.
  pub build_dir: PathBuf,
  pub artifacts: BuildArtifacts,
  /// Format label reported by the constraint emitter.
  pub constraints_format: String,
  /// Every stage entered, in order.
  pub stages: Vec<BuildStage>,
}

impl BuildOutcome {
  /// The last stage reached.
  pub fn stage(&self) -> BuildStage {
    self.stages.last().copied().unwrap_or(BuildStage::Configured)
  }

  /// Whether the driver script was run to success.
  pub fn ran(&self) -> bool {
    self.stage() == BuildStage::Succeeded
  }
}
