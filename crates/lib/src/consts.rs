/// Application name, used in generated script headers.
pub const APP_NAME: &str = "oxflow";

/// Generator version recorded in script headers next to the design revision.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Synthesizer executable.
pub const SYNTHESIZER: &str = "yosys";

/// Place-and-route executable.
pub const PLACE_AND_ROUTE: &str = "nextpnr-nexus";

/// Bitstream packer executable.
pub const PACKER: &str = "prjoxide";

/// Executables that must resolve on the search path before a build script runs.
pub const REQUIRED_TOOLS: [&str; 2] = [SYNTHESIZER, PLACE_AND_ROUTE];

/// Build name used when neither the caller nor the design names one.
pub const DEFAULT_BUILD_NAME: &str = "top";

/// Build directory used when the caller does not name one.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Revision text used when the design directory is not inside a git repository.
pub const UNKNOWN_REVISION: &str = "--------";
