use anyhow::Result;

use oxflow_lib::platform::Host;

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let host = Host::detect();

  if format.is_json() {
    return print_json(&serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "platform": host.triple(),
      "os": host.os_name(),
      "arch": host.arch,
      "dialect": host.dialect,
    }));
  }

  println!("oxflow v{}", env!("CARGO_PKG_VERSION"));
  print_stat("Platform", &host.triple());
  print_stat("Dialect", host.dialect.as_str());
  Ok(())
}
