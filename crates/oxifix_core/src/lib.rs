//! Core utilities for oxifix tools.
//!
//! This crate provides shared functionality for postprocessing compiled
//! JavaScript output, including:
//! - The alias map and rewrite policy data model
//! - Loading project configuration (JSON with comments)
//! - Collecting files from the build output directory
//! - Git root discovery and extension defaults

mod collector;
mod config;
mod constants;
mod jsonc;
mod types;

// Re-export public API
pub use collector::{collect_files, has_allowed_extension};
pub use config::{ProjectConfig, find_git_root, load_project_config};
pub use constants::{DEFAULT_EXTENSIONS, DEFAULT_OUT_DIR, PROJECT_CONFIG_FILE, SOURCE_EXTENSION};
pub use jsonc::strip_json_comments;
pub use types::{AliasMap, Operation, PolicyEntry, RewritePolicy, strip_wildcard};
