use log::trace;
use path_clean::clean;
use std::path::{Component, Path, PathBuf};

/// Resolve an alias target against the output root, dropping any trailing `/*`.
pub(crate) fn resolve_target(root: &Path, target: &str) -> PathBuf {
    clean(root.join(oxifix_core::strip_wildcard(target)))
}

/// Create a relative path from `base` to `target`.
///
/// Both paths are expected to be normalized. Returns `None` when the paths
/// live on different roots (e.g. different Windows drives) or when `base`
/// still contains `..` components that cannot be walked back.
pub(crate) fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    if target.has_root() != base.has_root() {
        return None;
    }

    let target_components: Vec<Component> = target.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    if let (Some(Component::Prefix(t)), Some(Component::Prefix(b))) =
        (target_components.first(), base_components.first())
        && t != b
    {
        return None;
    }

    let common = target_components
        .iter()
        .zip(&base_components)
        .take_while(|(t, b)| t == b)
        .count();

    let mut result = PathBuf::new();
    for component in &base_components[common..] {
        match component {
            Component::Normal(_) => result.push(".."),
            Component::ParentDir => return None,
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    for component in &target_components[common..] {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Some(result)
}

/// Build a relative module specifier for `remainder` inside `target`, as seen from `from_dir`.
///
/// Separators are always `/`, and the result always starts with `./` or `../`
/// (or is exactly `.`/`..`) so that it is never mistaken for a bare package name.
pub(crate) fn relative_specifier(from_dir: &Path, target: &Path, remainder: &str) -> Option<String> {
    let relative = make_relative(&clean(target), &clean(from_dir))?;

    let joined = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(p) => Some(p.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let prefix = if joined.is_empty() {
        ".".to_string()
    } else if joined == ".." || joined.starts_with("../") {
        joined
    } else {
        format!("./{}", joined)
    };

    let remainder = remainder.strip_prefix('/').unwrap_or(remainder);
    let specifier =
        if remainder.is_empty() { prefix } else { format!("{}/{}", prefix, remainder) };

    trace!(
        "Relative specifier from {} to {} (+ '{}'): {}",
        from_dir.display(),
        target.display(),
        remainder,
        specifier
    );
    Some(specifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_relative_sibling_tree() {
        let rel = make_relative(Path::new("/project/src/lib"), Path::new("/project/dist/app"));
        assert_eq!(rel, Some(PathBuf::from("../../src/lib")));
    }

    #[test]
    fn test_make_relative_descendant() {
        let rel = make_relative(Path::new("/project/dist/lib/ui"), Path::new("/project/dist"));
        assert_eq!(rel, Some(PathBuf::from("lib/ui")));
    }

    #[test]
    fn test_make_relative_ancestor() {
        let rel = make_relative(Path::new("/project"), Path::new("/project/dist/app"));
        assert_eq!(rel, Some(PathBuf::from("../..")));
    }

    #[test]
    fn test_make_relative_same_dir() {
        let rel = make_relative(Path::new("/project/dist"), Path::new("/project/dist"));
        assert_eq!(rel, Some(PathBuf::new()));
    }

    #[test]
    fn test_make_relative_mixed_roots() {
        assert_eq!(make_relative(Path::new("/project/src"), Path::new("dist")), None);
    }

    #[test]
    fn test_resolve_target_strips_wildcard() {
        let root = Path::new("/project/dist");
        assert_eq!(resolve_target(root, "./src/lib/*"), PathBuf::from("/project/dist/src/lib"));
        assert_eq!(resolve_target(root, "../shared"), PathBuf::from("/project/shared"));
        assert_eq!(resolve_target(root, "/project/src/lib"), PathBuf::from("/project/src/lib"));
    }

    #[test]
    fn test_relative_specifier_parent_dirs() {
        let spec = relative_specifier(
            Path::new("/project/dist/app"),
            Path::new("/project/src/lib"),
            "util",
        );
        assert_eq!(spec.as_deref(), Some("../../src/lib/util"));
    }

    #[test]
    fn test_relative_specifier_prepends_current_dir() {
        let spec =
            relative_specifier(Path::new("/project/dist"), Path::new("/project/dist/lib"), "a/b");
        assert_eq!(spec.as_deref(), Some("./lib/a/b"));
    }

    #[test]
    fn test_relative_specifier_same_dir() {
        let spec =
            relative_specifier(Path::new("/project/dist/lib"), Path::new("/project/dist/lib"), "x");
        assert_eq!(spec.as_deref(), Some("./x"));
    }

    #[test]
    fn test_relative_specifier_strips_single_leading_slash() {
        let spec =
            relative_specifier(Path::new("/project/dist"), Path::new("/project/dist/lib"), "/x");
        assert_eq!(spec.as_deref(), Some("./lib/x"));
    }

    #[test]
    fn test_relative_specifier_empty_remainder() {
        let spec =
            relative_specifier(Path::new("/project/dist/app"), Path::new("/project/dist/lib"), "");
        assert_eq!(spec.as_deref(), Some("../lib"));
    }

    #[test]
    fn test_relative_specifier_hidden_dir_is_not_a_parent_marker() {
        let spec = relative_specifier(
            Path::new("/project/dist"),
            Path::new("/project/dist/.generated"),
            "x",
        );
        assert_eq!(spec.as_deref(), Some("./.generated/x"));
    }
}
