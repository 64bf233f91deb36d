use std::io::Write;

use anyhow::{Context, Result};

use oxflow_lib::build::Toolchain;

use super::prepare;
use crate::TargetArgs;

/// Print a rendered script to stdout, byte for byte.
pub fn cmd_script(target: &TargetArgs, synthesis: bool) -> Result<()> {
  let (design, request, revision) = prepare(target, false)?;
  let rendered = Toolchain::new(revision)
    .render(&design, &request)
    .context("Failed to render build scripts")?;

  let script = if synthesis { rendered.synthesis } else { rendered.build };
  let mut stdout = std::io::stdout().lock();
  stdout.write_all(script.contents().as_bytes())?;
  stdout.flush()?;
  Ok(())
}
