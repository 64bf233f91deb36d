//! Synthesizer `read_*` directives for registered sources.

use std::path::Path;

use crate::design::{Language, SourceFile};

/// Reader name for a source language.
///
/// The synthesizer has no dedicated SystemVerilog reader, so SystemVerilog is
/// read through the Verilog reader with its `-sv` extension. Every other
/// language name is forwarded as-is.
pub fn reader(language: &Language) -> String {
  match language {
    Language::SystemVerilog => "verilog -sv".to_string(),
    other => other.as_str().to_string(),
  }
}

/// Include search flags, one ` -I<path>` per directory.
pub fn include_flags<P: AsRef<Path>>(include_paths: &[P]) -> String {
  include_paths
    .iter()
    .map(|p| format!(" -I{}", p.as_ref().display()))
    .collect()
}

/// One read directive per source, in registration order.
pub fn import_sources<P: AsRef<Path>>(sources: &[SourceFile], include_paths: &[P]) -> Vec<String> {
  let includes = include_flags(include_paths);
  sources
    .iter()
    .map(|source| format!("read_{}{} {}", reader(&source.language), includes, source.path.display()))
    .collect()
}

/// Read directives joined for embedding into the synthesis script.
pub fn import_sources_text<P: AsRef<Path>>(sources: &[SourceFile], include_paths: &[P]) -> String {
  import_sources(sources, include_paths).join("\n")
}
