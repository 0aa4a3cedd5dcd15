use anyhow::{Context, Result};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Collect every file below the build output directory, sorted by path.
///
/// Standard ignore filters are disabled: output directories are usually
/// listed in `.gitignore`, and their contents must still be visited.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for res in walker {
        let dent = res.with_context(|| format!("Failed to walk {}", root.display()))?;
        if dent.file_type().is_some_and(|ft| ft.is_file()) {
            trace!("Found file: {}", dent.path().display());
            files.push(dent.into_path());
        }
    }

    debug!("Collected {} files", files.len());
    Ok(files)
}

/// Whether the file extension is in the allow-list (compared without a leading dot).
pub fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.trim_start_matches('.') == ext))
}
