//! Command templates for the Nexus flow.
//!
//! See [`crate::template`] for the placeholder grammar.

use crate::template::Template;

/// Synthesizer control script (`<build_name>.ys`).
///
/// Placeholders: `read_files`, `nwl`, `abc`, `build_name`.
pub const SYNTHESIS_TEMPLATE: Template = Template::new(
  "synthesis",
  &[
    "verilog_defaults -push",
    "verilog_defaults -add -defer",
    "{read_files}",
    "verilog_defaults -pop",
    "attrmap -tocase keep -imap keep=\"true\" keep=1 -imap keep=\"false\" keep=0 -remove keep=0",
    "synth_nexus -flatten {nwl} {abc} -json {build_name}.json -top {build_name}",
  ],
);

/// Build driver script body (`build_<build_name>.sh` / `.bat`).
///
/// Placeholders: `build_name`, `constraint_file`, `device`, `timefailarg`,
/// `ignoreloops`, `seed`. Every line additionally receives `{fail_stmt}`.
pub const BUILD_TEMPLATE: Template = Template::new(
  "build",
  &[
    "yosys -l {build_name}.rpt {build_name}.ys",
    "nextpnr-nexus --json {build_name}.json --pdc {constraint_file} --fasm {build_name}.fasm --device {device} {timefailarg} {ignoreloops} --seed {seed}",
    "prjoxide pack {build_name}.fasm {build_name}.bit",
  ],
);

/// Per-line suffix wired into every build template line.
pub const FAIL_STMT_SUFFIX: &str = "{fail_stmt}";
