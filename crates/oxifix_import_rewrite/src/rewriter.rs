use anyhow::{Context, Result};
use log::{debug, trace};
use oxifix_core::{AliasMap, Operation, RewritePolicy, strip_wildcard};
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    logger::Logger,
    paths::{relative_specifier, resolve_target},
    patterns::{AliasPatterns, MatchRecord, RELATIVE_SPECIFIER, select_non_overlapping},
    types::{RewriteOutcome, UnresolvedAlias},
};

/// Specifier extensions that are never source text and must not get the source extension
const NON_SOURCE_EXTENSIONS: &[&str] = &["json", "css", "wasm", "node", "mjs", "cjs"];

enum Resolution {
    Remove,
    Replace(String),
    Unresolved(String),
}

/// Rewrites aliased import specifiers of emitted files into relative ones.
///
/// The alias map and policy are borrowed read-only for the whole run.
pub struct Rewriter<'a> {
    root: &'a Path,
    alias_map: &'a AliasMap,
    policy: &'a RewritePolicy,
    patterns: Option<AliasPatterns>,
    source_extension: String,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        root: &'a Path,
        alias_map: &'a AliasMap,
        policy: &'a RewritePolicy,
        source_extension: &str,
    ) -> Result<Self> {
        let aliases = alias_map.keys().chain(policy.keys()).map(|k| strip_wildcard(k));
        let patterns = AliasPatterns::new(aliases)?;

        Ok(Self {
            root,
            alias_map,
            policy,
            patterns,
            source_extension: source_extension.trim_start_matches('.').to_string(),
        })
    }

    /// Read, rewrite and (unless `dry_run`) write back a single file.
    ///
    /// The file is only written when at least one pass changed it.
    pub fn rewrite_file<W: Write>(
        &self,
        file: &Path,
        logger: &mut Logger<W>,
        dry_run: bool,
    ) -> Result<RewriteOutcome> {
        trace!("Rewriting {}", file.display());
        let text =
            fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

        let (rewritten, outcome) = self.rewrite_source(file, &text, logger);

        if !outcome.is_changed() {
            debug!("No changes in {}", file.display());
            return Ok(outcome);
        }

        let display = self.display_path(file);
        if dry_run {
            logger.info(format!("Would rewrite {} ({} changes)", display, outcome.changes()));
        } else {
            fs::write(file, rewritten)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            logger.success(format!("Rewrote {} ({} changes)", display, outcome.changes()));
        }
        Ok(outcome)
    }

    /// Run all four passes over `text` as if it were the content of `file`.
    pub fn rewrite_source<W: Write>(
        &self,
        file: &Path,
        text: &str,
        logger: &mut Logger<W>,
    ) -> (String, RewriteOutcome) {
        let (mut buffer, mut outcome) = self.rewrite_aliases(file, text, logger);

        if self.is_source_text(file) {
            let (fixed, count) = self.fix_extensions(&buffer);
            if count > 0 {
                logger.debug(format!(
                    "Appended .{} to {} specifiers in {}",
                    self.source_extension,
                    count,
                    self.display_path(file)
                ));
            }
            buffer = fixed;
            outcome.extensions_fixed = count;
        }

        (buffer, outcome)
    }

    /// Passes 1-3: rewrite or remove aliased imports.
    ///
    /// All matches are taken from the original text and applied in reverse
    /// offset order, so earlier edits never shift later offsets.
    pub fn rewrite_aliases<W: Write>(
        &self,
        file: &Path,
        text: &str,
        logger: &mut Logger<W>,
    ) -> (String, RewriteOutcome) {
        let mut outcome = RewriteOutcome::default();
        let Some(patterns) = &self.patterns else {
            return (text.to_string(), outcome);
        };

        let records = select_non_overlapping(patterns.find_all(text));
        if records.is_empty() {
            return (text.to_string(), outcome);
        }

        let file_dir = file.parent().unwrap_or(self.root);
        let display = self.display_path(file);
        let mut edits: Vec<(usize, usize, String)> = Vec::with_capacity(records.len());

        for record in &records {
            match self.resolve(record, file_dir) {
                Resolution::Remove => {
                    logger.info(format!(
                        "Removed import of '{}' in {}",
                        record.specifier(),
                        display
                    ));
                    outcome.removed += 1;
                    edits.push((record.start, record.end, String::new()));
                }
                Resolution::Replace(specifier) => {
                    logger.info(format!(
                        "Replaced '{}' with '{}' in {}",
                        record.specifier(),
                        specifier,
                        display
                    ));
                    outcome.replaced += 1;
                    edits.push((record.start, record.end, record.render(&specifier)));
                }
                Resolution::Unresolved(reason) => {
                    let line = text[..record.start].matches('\n').count() + 1;
                    logger.warn(format!(
                        "Unresolved alias '{}' in {}:{} (offset {}): {}",
                        record.alias, display, line, record.start, reason
                    ));
                    outcome.unresolved.push(UnresolvedAlias {
                        alias: record.alias.clone(),
                        offset: record.start,
                        line,
                    });
                }
            }
        }

        let mut buffer = text.to_string();
        for (start, end, replacement) in edits.iter().rev() {
            buffer.replace_range(*start..*end, replacement);
        }
        (buffer, outcome)
    }

    /// Pass 4: append the source extension to relative specifiers that lack it.
    pub fn fix_extensions(&self, text: &str) -> (String, usize) {
        let suffix = format!(".{}", self.source_extension);
        let mut count = 0;

        let fixed = RELATIVE_SPECIFIER.replace_all(text, |caps: &regex::Captures| {
            let whole = &caps[0];
            let path = &caps["path"];
            if !needs_extension(path, &suffix) {
                return whole.to_string();
            }

            count += 1;
            trace!("Appending {} to '{}'", suffix, path);
            // The closing quote is the last byte of the match
            let (head, quote) = whole.split_at(whole.len() - 1);
            format!("{}{}{}", head, suffix, quote)
        });

        (fixed.into_owned(), count)
    }

    fn resolve(&self, record: &MatchRecord, file_dir: &Path) -> Resolution {
        let Some((pattern, entry)) = lookup(self.policy, &record.alias) else {
            return Resolution::Unresolved("no postprocess policy for this alias".to_string());
        };

        match entry.op {
            Operation::Remove => Resolution::Remove,
            Operation::Replace => {
                let target = entry.target.as_deref().or_else(|| {
                    lookup(self.alias_map, &record.alias)
                        .and_then(|(_, targets)| targets.first())
                        .map(String::as_str)
                });
                let Some(target) = target else {
                    return Resolution::Unresolved(format!(
                        "'{}' has no target and no compilerOptions.paths entry",
                        pattern
                    ));
                };

                let target_dir = resolve_target(self.root, target);
                match relative_specifier(file_dir, &target_dir, &record.remainder) {
                    Some(specifier) => Resolution::Replace(specifier),
                    None => Resolution::Unresolved(format!(
                        "cannot build a relative path to {}",
                        target_dir.display()
                    )),
                }
            }
        }
    }

    fn is_source_text(&self, file: &Path) -> bool {
        file.extension().and_then(|e| e.to_str()) == Some(self.source_extension.as_str())
    }

    fn display_path(&self, file: &Path) -> String {
        file.strip_prefix(self.root).unwrap_or(file).to_string_lossy().to_string()
    }
}

/// Look up an alias as `alias/*` first, then as the bare alias.
fn lookup<'m, V>(
    table: &'m BTreeMap<String, V>,
    alias: &str,
) -> Option<(&'m String, &'m V)> {
    table.get_key_value(&format!("{}/*", alias)).or_else(|| table.get_key_value(alias))
}

fn needs_extension(path: &str, suffix: &str) -> bool {
    if path.ends_with(suffix) || path.ends_with('/') || path == "." || path == ".." {
        return false;
    }
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match PathBuf::from(last_segment).extension().and_then(|e| e.to_str()) {
        Some(ext) => !NON_SOURCE_EXTENSIONS.contains(&ext),
        None => true,
    }
}
