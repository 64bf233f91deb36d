//! Tool verification and build script execution.
//!
//! Before a driver script runs, the synthesizer and place-and-route tools must
//! resolve on the search path. A missing tool is reported by name and no
//! process is spawned. The script itself runs in the foreground with its
//! output passed straight through to the operator.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::script::ScriptDialect;

/// Required tools that could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
  "unable to find the Yosys/Nextpnr toolchain (missing: {missing_list}), please:\n\
   - add {required_list} to your $PATH",
  missing_list = .missing.join(", "),
  required_list = .required.join(" and ")
)]
pub struct MissingTools {
  pub missing: Vec<String>,
  pub required: Vec<String>,
}

/// Errors from running a build script.
#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  MissingTools(#[from] MissingTools),

  #[error("failed to start {program} for {}: {source}", script.display())]
  Spawn {
    program: String,
    script: PathBuf,
    source: io::Error,
  },

  #[error("build script {} failed with exit code {code:?}", script.display())]
  ScriptFailed { script: PathBuf, code: Option<i32> },
}

/// Finds executables.
pub trait ToolProbe {
  /// Resolve `tool` to a path, or `None` when it cannot be found.
  fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Looks tools up on the process `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl PathProbe {
  pub fn new() -> Self {
    Self
  }
}

impl ToolProbe for PathProbe {
  fn locate(&self, tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
  }
}

/// Lookup result for one tool.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToolStatus {
  pub tool: String,
  pub path: Option<PathBuf>,
}

/// Look up every tool without failing.
pub fn probe_tools(probe: &impl ToolProbe, tools: &[&str]) -> Vec<ToolStatus> {
  tools
    .iter()
    .map(|tool| ToolStatus {
      tool: tool.to_string(),
      path: probe.locate(tool),
    })
    .collect()
}

/// Require every tool to resolve; returns their paths in order.
pub fn verify_tools(probe: &impl ToolProbe, tools: &[&str]) -> Result<Vec<PathBuf>, MissingTools> {
  let statuses = probe_tools(probe, tools);
  let missing: Vec<String> = statuses
    .iter()
    .filter(|s| s.path.is_none())
    .map(|s| s.tool.clone())
    .collect();

  if !missing.is_empty() {
    return Err(MissingTools {
      missing,
      required: tools.iter().map(|t| t.to_string()).collect(),
    });
  }

  Ok(statuses.into_iter().filter_map(|s| s.path).collect())
}

/// A fully resolved interpreter invocation for a driver script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl Invocation {
  /// Run `script` through the dialect's interpreter from `cwd`.
  pub fn for_script(dialect: ScriptDialect, script: &Path, cwd: &Path) -> Self {
    let (program, leading) = dialect.interpreter();
    let mut args: Vec<String> = leading.iter().map(|a| a.to_string()).collect();
    args.push(script.to_string_lossy().to_string());
    Self {
      program: program.to_string(),
      args,
      cwd: cwd.to_path_buf(),
    }
  }
}

/// Spawns interpreter processes.
pub trait ScriptRunner {
  /// Run to completion and return the exit code (`None` when terminated by a signal).
  fn run(&self, invocation: &Invocation) -> impl Future<Output = io::Result<Option<i32>>>;
}

/// Runs the interpreter as a child process with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ScriptRunner for ShellRunner {
  async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
    debug!(
      program = %invocation.program,
      args = ?invocation.args,
      cwd = %invocation.cwd.display(),
      "spawning process"
    );

    let status = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .status()
      .await?;

    Ok(status.code())
  }
}

/// Run the driver script and require a zero exit code.
///
/// The script path is relative to `cwd` or absolute. Callers verify the
/// required tools first (see [`verify_tools`]).
pub async fn execute_script(
  runner: &impl ScriptRunner,
  dialect: ScriptDialect,
  script: &Path,
  cwd: &Path,
) -> Result<(), RunError> {
  let invocation = Invocation::for_script(dialect, script, cwd);
  info!(script = %script.display(), interpreter = %invocation.program, "running build script");

  let code = runner.run(&invocation).await.map_err(|e| RunError::Spawn {
    program: invocation.program.clone(),
    script: script.to_path_buf(),
    source: e,
  })?;

  match code {
    Some(0) => Ok(()),
    code => Err(RunError::ScriptFailed {
      script: script.to_path_buf(),
      code,
    }),
  }
}

#[cfg(test)]
pub(crate) mod testutil {
  use std::collections::HashMap;
  use std::sync::Mutex;

  use super::*;

  /// Probe that only knows the tools it was given.
  pub struct FakeProbe {
    tools: HashMap<String, PathBuf>,
  }

  impl FakeProbe {
    pub fn with(tools: &[&str]) -> Self {
      Self {
        tools: tools
          .iter()
          .map(|t| (t.to_string(), PathBuf::from("/opt/fpga/bin").join(t)))
          .collect(),
      }
    }
  }

  impl ToolProbe for FakeProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
      self.tools.get(tool).cloned()
    }
  }

  /// Runner that records invocations and returns a fixed exit code.
  pub struct RecordingRunner {
    pub code: Option<i32>,
    pub calls: Mutex<Vec<Invocation>>,
  }

  impl RecordingRunner {
    pub fn exiting_with(code: Option<i32>) -> Self {
      Self {
        code,
        calls: Mutex::new(Vec::new()),
      }
    }

    pub fn call_count(&self) -> usize {
      self.calls.lock().unwrap().len()
    }
  }

  impl ScriptRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> io::Result<Option<i32>> {
      self.calls.lock().unwrap().push(invocation.clone());
      Ok(self.code)
    }
  }
}
