use serde::Deserialize;
use std::collections::BTreeMap;

/// Alias pattern (e.g. `"$lib/*"`) to ordered physical target directories.
pub type AliasMap = BTreeMap<String, Vec<String>>;

/// Alias pattern to the rewrite decision taken for it.
pub type RewritePolicy = BTreeMap<String, PolicyEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Delete the whole import statement
    Remove,
    /// Substitute the aliased specifier with a relative path
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyEntry {
    pub op: Operation,
    /// Explicit target directory; falls back to the first alias map entry when absent
    #[serde(default)]
    pub target: Option<String>,
}

impl PolicyEntry {
    pub fn remove() -> Self {
        Self { op: Operation::Remove, target: None }
    }

    pub fn replace(target: Option<&str>) -> Self {
        Self { op: Operation::Replace, target: target.map(str::to_string) }
    }
}

/// Strip the trailing wildcard from an alias pattern or target (`"$lib/*"` -> `"$lib"`).
pub fn strip_wildcard(pattern: &str) -> &str {
    let trimmed = pattern.trim_end_matches('*');
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() { pattern } else { trimmed }
}
