use anyhow::{Context, Result, anyhow};
use log::{debug, trace, warn};
use path_clean::clean;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    constants::DEFAULT_OUT_DIR,
    jsonc::strip_json_comments,
    types::{AliasMap, Operation, RewritePolicy},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProjectConfig {
    #[serde(default)]
    compiler_options: RawCompilerOptions,
    #[serde(default)]
    postprocess: RawPostprocess,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    out_dir: Option<String>,
    #[serde(default)]
    paths: AliasMap,
}

#[derive(Debug, Default, Deserialize)]
struct RawPostprocess {
    #[serde(default)]
    paths: RewritePolicy,
}

/// Everything the postprocess step reads from the project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    /// Absolute build output directory (`compilerOptions.outDir`)
    pub out_dir: PathBuf,
    pub alias_map: AliasMap,
    pub policy: RewritePolicy,
}

pub fn find_git_root() -> Result<PathBuf> {
    debug!("Searching for git root");
    let mut current_dir = env::current_dir()?;
    trace!("Starting search from: {:?}", current_dir);

    loop {
        let git_dir = current_dir.join(".git");
        trace!("Checking for .git at: {:?}", git_dir);
        if git_dir.exists() {
            debug!("Found git root at: {:?}", current_dir);
            return Ok(current_dir);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                debug!("Could not find .git directory in any parent folder");
                return Err(anyhow!("Could not find .git directory in any parent folder"));
            }
        }
    }
}

/// Load alias map, rewrite policy and output directory from a tsconfig-style file.
///
/// The file may contain comments and trailing commas. A missing or malformed
/// file is an error; missing sections default to empty tables.
pub fn load_project_config(config_path: &Path) -> Result<ProjectConfig> {
    debug!("Loading project configuration from {}", config_path.display());
    let content = fs::read_to_string(config_path).with_context(|| {
        format!("Failed to read project configuration {}", config_path.display())
    })?;

    let raw: RawProjectConfig = serde_json::from_str(&strip_json_comments(&content))
        .with_context(|| format!("Invalid project configuration {}", config_path.display()))?;

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let out_dir_setting = raw.compiler_options.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR);
    let out_dir = clean(config_dir.join(out_dir_setting));
    trace!("Resolved outDir '{}' to {}", out_dir_setting, out_dir.display());

    let alias_map = raw.compiler_options.paths;
    let policy = raw.postprocess.paths;

    for (pattern, entry) in &policy {
        if entry.op == Operation::Replace
            && entry.target.is_none()
            && alias_map.get(pattern).is_none_or(|targets| targets.is_empty())
        {
            warn!(
                "Policy for '{}' has no explicit target and no compilerOptions.paths entry",
                pattern
            );
        }
    }

    debug!("Loaded {} path aliases and {} policy entries", alias_map.len(), policy.len());
    Ok(ProjectConfig { config_path: config_path.to_path_buf(), out_dir, alias_map, policy })
}
