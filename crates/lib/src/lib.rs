//! oxflow-lib: Build flow generation for the Lattice Nexus FPGA toolchain
//!
//! This crate turns a platform description into a runnable build:
//! - `design`: Lua design files describing sources, pins and clocks
//! - `import`: synthesizer read directives for registered sources
//! - `constraints`: pin and clock constraint files
//! - `script`: the synthesis script and the per-dialect driver script
//! - `runner`: tool verification and script execution
//! - `build`: the orchestration tying every stage together

pub mod artifacts;
pub mod build;
pub mod constraints;
pub mod consts;
pub mod design;
pub mod import;
pub mod options;
pub mod platform;
pub mod revision;
pub mod runner;
pub mod script;
pub mod template;
pub mod templates;
