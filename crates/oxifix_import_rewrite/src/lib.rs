//! Import alias rewriting for compiled JavaScript output.
//!
//! After `tsc` (or another compiler) has emitted its files, path-aliased
//! specifiers such as `"$lib/util"` are still present in the output and
//! cannot be resolved at runtime. This crate rewrites them into relative
//! paths, or removes the import, according to the `postprocess.paths`
//! table of the project configuration, and appends the missing `.js`
//! extension to relative specifiers.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use oxifix_import_rewrite::{Config, Logger, run_postprocess};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     project: None,
//!     out_dir: None,
//!     extensions: vec!["js".to_string(), "map".to_string()],
//!     source_extension: "js".to_string(),
//!     dry_run: false,
//!     project_config: None,
//! };
//!
//! let mut logger = Logger::new(BufWriter::new(std::io::stdout()), false);
//! let summary = run_postprocess(cfg, &mut logger)?;
//! oxifix_import_rewrite::print_summary(logger.writer_mut(), &summary, 0, false)?;
//! logger.writer_mut().flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod logger;
mod paths;
mod patterns;
mod reporter;
mod rewriter;
mod runner;
mod types;

// Re-export public API
pub use config::Config;
pub use logger::{Level, Logger};
pub use patterns::{ImportKind, MatchRecord};
pub use reporter::print_summary;
pub use rewriter::Rewriter;
pub use runner::run_postprocess;
pub use types::{RewriteOutcome, RunSummary, UnresolvedAlias};
