//! Lua design file evaluation.
//!
//! A design file is a Lua chunk returning a table:
//!
//! ```lua
//! return {
//!   name = "blinky",
//!   device = "LIFCL-40-9BG400C",
//!   sources = {
//!     { path = "rtl/blinky.v", language = "verilog" },
//!     { path = "rtl/pwm.sv", language = "systemverilog" },
//!   },
//!   include_paths = { "rtl/include" },
//!   ios = {
//!     { signal = "clk", pins = { "L13" }, io_standard = "LVCMOS33" },
//!     { signal = "led", pins = { "E17", "F13" }, io_standard = "LVCMOS33" },
//!   },
//!   clocks = { { net = "clk", period_ns = 83.33 } },
//!   toolchain = { abc9 = true, seed = 3 },
//! }
//! ```
//!
//! The `oxflow` global exposes `oxflow.os`, `oxflow.arch`, `oxflow.dialect`
//! (`posix` or `batch`) and `oxflow.dir` (the directory of the design file).
//! Relative source and include paths are resolved against `oxflow.dir`.

use std::path::{Path, PathBuf};

use mlua::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use super::Design;
use crate::platform::Host;

/// Errors that can occur while loading a design file.
#[derive(Debug, Error)]
pub enum DesignError {
  #[error("cannot read design file {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  /// Evaluation or deserialization failure, flattened to its message so the
  /// error can leave the thread that owns the Lua state.
  #[error("lua error: {0}")]
  Lua(String),

  #[error("design file {} must return a table", .0.display())]
  NotATable(PathBuf),

  #[error("design file {} does not name a device", .0.display())]
  EmptyDevice(PathBuf),
}

impl From<LuaError> for DesignError {
  fn from(e: LuaError) -> Self {
    Self::Lua(e.to_string())
  }
}

/// Load and evaluate a design file.
pub fn load_design(path: &Path) -> Result<Design, DesignError> {
  let canonical_path = dunce::canonicalize(path).map_err(|e| DesignError::Read {
    path: path.to_path_buf(),
    source: e,
  })?;
  let content = std::fs::read_to_string(&canonical_path).map_err(|e| DesignError::Read {
    path: canonical_path.clone(),
    source: e,
  })?;
  let design_dir = canonical_path.parent().unwrap_or(Path::new(".")).to_path_buf();

  let lua = create_runtime(&design_dir)?;
  let value = lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .eval::<LuaValue>()?;

  if !value.is_table() {
    return Err(DesignError::NotATable(canonical_path));
  }

  let mut design: Design = lua.from_value(value)?;
  if design.device.trim().is_empty() {
    return Err(DesignError::EmptyDevice(canonical_path));
  }

  resolve_paths(&mut design, &design_dir);

  for source in design.sources.iter().filter(|s| !s.language.is_known()) {
    warn!(
      path = %source.path.display(),
      language = %source.language,
      "unrecognized source language, forwarding to the synthesizer as-is"
    );
  }

  debug!(
    path = %canonical_path.display(),
    device = %design.device,
    sources = design.sources.len(),
    ios = design.ios.len(),
    clocks = design.clocks.len(),
    "design loaded"
  );

  Ok(design)
}

/// Create a Lua runtime with the `oxflow` global registered.
pub fn create_runtime(design_dir: &Path) -> LuaResult<Lua> {
  let lua = Lua::new();
  let oxflow = lua.create_table()?;

  let host = Host::detect();
  oxflow.set("platform", host.triple())?;
  oxflow.set("os", host.os_name())?;
  oxflow.set("arch", host.arch)?;
  oxflow.set("dialect", host.dialect.as_str())?;
  oxflow.set("dir", design_dir.to_string_lossy().to_string())?;

  lua.globals().set("oxflow", oxflow)?;
  Ok(lua)
}

fn resolve_paths(design: &mut Design, design_dir: &Path) {
  for source in &mut design.sources {
    if source.path.is_relative() {
      source.path = design_dir.join(&source.path);
    }
  }
  for include in &mut design.include_paths {
    if include.is_relative() {
      *include = design_dir.join(&*include);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::design::Language;
  use tempfile::TempDir;
  use tracing_test::traced_test;

  fn write_design(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("design.lua");
    std::fs::write(&path, content).unwrap();
    path
  }

  #[test]
  fn loads_full_design() {
    let temp = TempDir::new().unwrap();
    let path = write_design(
      &temp,
      r#"
        return {
          name = "blinky",
          device = "LIFCL-40-9BG400C",
          sources = {
            { path = "rtl/blinky.v", language = "verilog" },
            { path = "/abs/pwm.sv", language = "systemverilog", library = "lib", copy = true },
          },
          include_paths = { "rtl/include" },
          ios = {
            { signal = "led", pins = { "E17", "F13" }, io_standard = "LVCMOS33" },
          },
          clocks = { { net = "clk", period_ns = 10 } },
          toolchain = { abc9 = true, seed = 3 },
        }
      "#,
    );

    let design = load_design(&path).unwrap();
    let dir = dunce::canonicalize(temp.path()).unwrap();

    assert_eq!(design.name.as_deref(), Some("blinky"));
    assert_eq!(design.sources.len(), 2);
    assert_eq!(design.sources[0].path, dir.join("rtl/blinky.v"));
    assert_eq!(design.sources[0].library, "work");
    assert_eq!(design.sources[1].language, Language::SystemVerilog);
    assert!(design.sources[1].copy);
    assert_eq!(design.include_paths, vec![dir.join("rtl/include")]);
    assert_eq!(design.ios[0].pins, vec!["E17", "F13"]);
    assert_eq!(design.clocks[0].period_ns, 10.0);

    let options = design.options();
    assert!(options.abc9);
    assert_eq!(options.seed, 3);
    assert!(!options.nowidelut);
  }

  #[test]
  fn oxflow_global_is_available() {
    let temp = TempDir::new().unwrap();
    let path = write_design(
      &temp,
      r#"
        assert(type(oxflow.dir) == "string")
        return { device = "LIFCL-17-8SG72C", name = "t_" .. (oxflow.os or "unknown") }
      "#,
    );

    let design = load_design(&path).unwrap();
    assert!(design.name.unwrap().starts_with("t_"));
  }

  #[test]
  fn host_dialect_is_exposed() {
    let temp = TempDir::new().unwrap();
    let path = write_design(&temp, r#"return { device = "LIFCL-40", name = oxflow.dialect }"#);

    let design = load_design(&path).unwrap();
    assert_eq!(design.name.as_deref(), Some(Host::detect().dialect.as_str()));
  }

  #[test]
  fn lua_errors_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync + 'static>(_: &T) {}

    let temp = TempDir::new().unwrap();
    let path = write_design(&temp, "error('bad pin table')");

    let err = load_design(&path).unwrap_err();
    assert_send_sync(&err);
    assert!(err.to_string().contains("bad pin table"), "{err}");

    let err: anyhow::Error = err.into();
    assert!(err.to_string().starts_with("lua error"));
  }

  #[test]
  fn non_table_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_design(&temp, "return 42");
    assert!(matches!(load_design(&path), Err(DesignError::NotATable(_))));
  }

  #[test]
  fn empty_device_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_design(&temp, r#"return { device = "" }"#);
    assert!(matches!(load_design(&path), Err(DesignError::EmptyDevice(_))));
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let temp = TempDir::new().unwrap();
    let result = load_design(&temp.path().join("nope.lua"));
    assert!(matches!(result, Err(DesignError::Read { .. })));
  }

  #[test]
  fn lua_syntax_error_surfaces() {
    let temp = TempDir::new().unwrap();
    let path = write_design(&temp, "return {");
    assert!(matches!(load_design(&path), Err(DesignError::Lua(_))));
  }

  #[test]
  #[traced_test]
  fn unknown_language_warns() {
    let temp = TempDir::new().unwrap();
    let path = write_design(
      &temp,
      r#"return { device = "LIFCL-40", sources = { { path = "a.xyz", language = "xyz" } } }"#,
    );

    let design = load_design(&path).unwrap();
    assert_eq!(design.sources[0].language, Language::Other("xyz".to_string()));
    assert!(logs_contain("unrecognized source language"));
  }
}
