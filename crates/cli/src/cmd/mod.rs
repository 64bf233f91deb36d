mod build;
mod check;
mod info;
mod script;

pub use build::cmd_build;
pub use check::cmd_check;
pub use info::cmd_info;
pub use script::cmd_script;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use oxflow_lib::build::BuildRequest;
use oxflow_lib::design::{Design, load_design};
use oxflow_lib::revision;
use oxflow_lib::script::ScriptDialect;

use crate::TargetArgs;

/// Load the design and resolve the request shared by `build` and `script`.
fn prepare(target: &TargetArgs, run: bool) -> Result<(Design, BuildRequest, String)> {
  let design = load_design(&target.design).with_context(|| format!("Failed to load {}", target.design.display()))?;
  let options = design.options().with_overrides(&target.toolchain.overrides());

  let request = BuildRequest {
    build_name: target.build_name.clone(),
    options,
    dialect: target.dialect.unwrap_or_else(ScriptDialect::host),
    run,
    ..Default::default()
  };

  let design_dir = target
    .design
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or(Path::new("."));
  let revision = revision::describe(design_dir);
  debug!(?options, dialect = %request.dialect, revision = %revision, "build request resolved");

  Ok((design, request, revision))
}
