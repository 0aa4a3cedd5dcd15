//! Defaults shared by configuration loading and the postprocess driver.
//!
//! The compiler emits source-text files (`.js`) next to their source maps
//! (`.js.map`). Both pass the default allow-list, but only source-text files
//! carry import statements that the rewrite passes can match.

/// Extensions processed when no allow-list is given on the command line
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "map"];

/// Extension of emitted source-text files, appended by the extension fixup
pub const SOURCE_EXTENSION: &str = "js";

/// Output directory used when `compilerOptions.outDir` is not set
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Project configuration file looked up under the project root
pub const PROJECT_CONFIG_FILE: &str = "tsconfig.json";
