//! Build orchestration.
//!
//! A build takes a loaded [`Design`] through these stages:
//!
//! 1. Create the build directory and stage sources flagged for copying
//! 2. Import sources into synthesizer read directives
//! 3. Emit the constraint file and render both scripts
//! 4. Write the scripts
//! 5. Verify the required tools, then run the driver script
//!
//! Every step's outputs are files named after the build name, so each stage
//! only needs the build name to find its inputs. A failure at any stage ends
//! the build in [`BuildStage::Failed`]; nothing after it runs.

mod types;

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

pub use types::*;

use crate::artifacts::BuildArtifacts;
use crate::consts::REQUIRED_TOOLS;
use crate::constraints::{ConstraintEmitter, PdcEmitter};
use crate::design::{Design, SourceFile};
use crate::import::import_sources_text;
use crate::runner::{PathProbe, ScriptRunner, ShellRunner, ToolProbe, execute_script, verify_tools};
use crate::script::{BuildScriptInputs, render_build_script, render_synthesis_script};

/// Stages entered so far. Only moves forward, one stage at a time.
#[derive(Debug)]
struct Progress {
  stages: Vec<BuildStage>,
}

impl Progress {
  fn start() -> Self {
    Self {
      stages: vec![BuildStage::Configured],
    }
  }

  fn current(&self) -> BuildStage {
    self.stages.last().copied().unwrap_or(BuildStage::Configured)
  }

  /// Enter the next stage; a terminal build stays where it is.
  fn advance(&mut self) -> BuildStage {
    if let Some(next) = self.current().next() {
      debug!(from = %self.current(), to = %next, "build stage");
      self.stages.push(next);
    }
    self.current()
  }

  fn fail(&mut self) {
    if !self.current().is_terminal() {
      self.stages.push(BuildStage::Failed);
    }
  }
}

/// Runs builds with a tool probe, a script runner and a constraint emitter.
pub struct Toolchain<P = PathProbe, R = ShellRunner> {
  probe: P,
  runner: R,
  emitter: Box<dyn ConstraintEmitter + Send + Sync>,
  revision: String,
}

impl Toolchain {
  /// Toolchain resolving tools on `PATH` and running scripts as child processes.
  pub fn new(revision: impl Into<String>) -> Self {
    Self::with_parts(PathProbe::new(), ShellRunner, revision)
  }
}

impl<P: ToolProbe, R: ScriptRunner> Toolchain<P, R> {
  pub fn with_parts(probe: P, runner: R, revision: impl Into<String>) -> Self {
    Self {
      probe,
      runner,
      emitter: Box::new(PdcEmitter),
      revision: revision.into(),
    }
  }

  /// Replace the constraint emitter.
  pub fn with_emitter(mut self, emitter: impl ConstraintEmitter + Send + Sync + 'static) -> Self {
    self.emitter = Box::new(emitter);
    self
  }

  pub fn runner(&self) -> &R {
    &self.runner
  }

  /// Render both scripts without touching the filesystem.
  pub fn render(&self, design: &Design, request: &BuildRequest) -> Result<RenderedBuild, BuildError> {
    let build_name = request.resolve_build_name(design);
    let artifacts = BuildArtifacts::new(&build_name, request.dialect);
    let sources = staged_sources(&design.sources);
    let read_files = import_sources_text(&sources, &design.include_paths);
    self.render_scripts(design, request, &build_name, &read_files, &artifacts.constraints)
  }

  fn render_scripts(
    &self,
    design: &Design,
    request: &BuildRequest,
    build_name: &str,
    read_files: &str,
    constraint_file: &str,
  ) -> Result<RenderedBuild, BuildError> {
    let synthesis = render_synthesis_script(build_name, read_files, &request.options, request.dialect)?;
    let inputs = BuildScriptInputs {
      build_name,
      device: &design.device,
      constraint_file,
      revision: &self.revision,
    };
    let build = render_build_script(&inputs, &request.options, request.dialect)?;
    Ok(RenderedBuild { synthesis, build })
  }

  /// Run a build.
  ///
  /// With `request.run` unset the build stops after the scripts are written
  /// and no tool is looked up.
  pub async fn build(&self, design: &Design, request: &BuildRequest) -> Result<BuildOutcome, BuildFailure> {
    let build_name = request.resolve_build_name(design);
    info!(build = %build_name, device = %design.device, dialect = %request.dialect, "starting build");

    let mut progress = Progress::start();
    match self.run_stages(design, request, &build_name, &mut progress).await {
      Ok(outcome) => {
        info!(build = %build_name, stage = %outcome.stage(), "build finished");
        Ok(outcome)
      }
      Err(error) => {
        error!(build = %build_name, stage = %progress.current(), error = %error, "build failed");
        progress.fail();
        Err(BuildFailure {
          stages: progress.stages,
          error,
        })
      }
    }
  }

  async fn run_stages(
    &self,
    design: &Design,
    request: &BuildRequest,
    build_name: &str,
    progress: &mut Progress,
  ) -> Result<BuildOutcome, BuildError> {
    let build_dir = prepare_build_dir(&request.build_dir)?;
    let artifacts = BuildArtifacts::new(build_name, request.dialect);

    copy_flagged_sources(&design.sources, &build_dir)?;
    let sources = staged_sources(&design.sources);
    let read_files = import_sources_text(&sources, &design.include_paths);
    progress.advance();
    debug!(sources = sources.len(), includes = design.include_paths.len(), "sources imported");

    let constraints = self
      .emitter
      .emit(design, build_name, &build_dir)
      .map_err(BuildError::Constraints)?;
    let rendered = self.render_scripts(design, request, build_name, &read_files, &constraints.file_name)?;
    progress.advance();

    for script in [&rendered.synthesis, &rendered.build] {
      script.write_to(&build_dir).map_err(|source| BuildError::WriteFile {
        path: build_dir.join(&script.file_name),
        source,
      })?;
    }
    progress.advance();
    info!(dir = %build_dir.display(), script = %rendered.build.file_name, "build scripts written");

    if request.run {
      verify_tools(&self.probe, &REQUIRED_TOOLS)?;
      progress.advance();

      progress.advance();
      execute_script(
        &self.runner,
        request.dialect,
        Path::new(&rendered.build.file_name),
        &build_dir,
      )
      .await?;
      progress.advance();
    }

    Ok(BuildOutcome {
      build_dir,
      artifacts,
      constraints_format: constraints.format.to_string(),
      stages: progress.stages.clone(),
    })
  }
}

fn prepare_build_dir(dir: &Path) -> Result<PathBuf, BuildError> {
  std::fs::create_dir_all(dir).map_err(|source| BuildError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })?;
  dunce::canonicalize(dir).map_err(|source| BuildError::CreateDir {
    path: dir.to_path_buf(),
    source,
  })
}

/// Sources as the synthesizer sees them from inside the build directory.
fn staged_sources(sources: &[SourceFile]) -> Vec<SourceFile> {
  sources
    .iter()
    .map(|source| match (source.copy, source.path.file_name()) {
      (true, Some(name)) => SourceFile {
        path: PathBuf::from(name),
        ..source.clone()
      },
      _ => source.clone(),
    })
    .collect()
}

fn copy_flagged_sources(sources: &[SourceFile], build_dir: &Path) -> Result<(), BuildError> {
  for source in sources.iter().filter(|s| s.copy) {
    let Some(name) = source.path.file_name() else {
      return Err(BuildError::CopySource {
        path: source.path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "source path has no file name"),
      });
    };
    let dest = build_dir.join(name);
    std::fs::copy(&source.path, &dest).map_err(|e| BuildError::CopySource {
      path: source.path.clone(),
      source: e,
    })?;
    debug!(from = %source.path.display(), to = %dest.display(), "source copied");
  }
  Ok(())
}
