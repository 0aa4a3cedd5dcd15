//! Regex patterns for the import statement forms that get rewritten.
//!
//! Only the specifier-rewriting subset of the module syntax is recognized:
//!
//! 1. static imports: `import "$lib/polyfill";`
//! 2. dynamic imports: `import("$lib/lazy")`
//! 3. named imports and re-exports: `import { x } from "$lib/util";`, `export * from "$lib/util";`
//!
//! plus relative specifiers for the extension fixup. Alias tokens are
//! regex-escaped and must be followed by `/` or the closing quote, so `$lib`
//! never matches `$library/x`.

use anyhow::{Context, Result};
use log::{debug, trace};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Relative specifiers in `from "..."`, `import "..."` and `import("...")` positions.
/// `from(` is a call such as `Array.from("./a")`, not an import.
pub(crate) static RELATIVE_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:from\s*|import\s*\(?\s*)(?P<quote>["'])(?P<path>\.[^"'\r\n]*)["']"#)
        .expect("relative specifier pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Static,
    Dynamic,
    Named,
}

/// One aliased import statement found in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub kind: ImportKind,
    pub start: usize,
    pub end: usize,
    /// Statement text before the opening quote (keyword, whitespace, specifier clause)
    pub prefix: String,
    pub quote: char,
    /// Alias token without wildcard, e.g. `$lib`
    pub alias: String,
    /// Path after the alias token, without its leading `/`
    pub remainder: String,
    /// Statement text after the closing quote (closing paren, semicolon)
    pub suffix: String,
}

impl MatchRecord {
    /// Rebuild the statement around a new specifier.
    pub fn render(&self, specifier: &str) -> String {
        format!("{}{q}{}{q}{}", self.prefix, specifier, self.suffix, q = self.quote)
    }

    /// The aliased specifier as it appears in the source.
    pub fn specifier(&self) -> String {
        if self.remainder.is_empty() {
            self.alias.clone()
        } else {
            format!("{}/{}", self.alias, self.remainder)
        }
    }

    pub fn overlaps(&self, other: &MatchRecord) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub(crate) struct AliasPatterns {
    static_import: Regex,
    dynamic_import: Regex,
    named_import: Regex,
}

impl AliasPatterns {
    /// Build the three alias patterns, or `None` when there are no aliases to look for.
    pub(crate) fn new<'a>(aliases: impl IntoIterator<Item = &'a str>) -> Result<Option<Self>> {
        let mut tokens: Vec<&str> = aliases.into_iter().filter(|a| !a.is_empty()).collect();
        // Longest first so `$lib-extra` is tried before `$lib`
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();

        if tokens.is_empty() {
            debug!("No aliases configured, alias passes disabled");
            return Ok(None);
        }
        debug!("Building alias patterns for {:?}", tokens);

        let alternation = tokens.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        let specifier =
            format!(r#"(?P<quote>["'])(?P<alias>{})(?P<rest>/[^"'\r\n]*)?["']"#, alternation);

        let static_import = format!(r#"\bimport(?P<ws>\s*){}(?P<semi>;?)"#, specifier);
        let dynamic_import =
            format!(r#"\bimport(?P<ws>\s*)\(\s*{}\s*\)(?P<semi>;?)"#, specifier);
        // The clause is a run of identifiers, `*`, commas and `{...}` groups. Line
        // breaks are only allowed inside braces, so the keyword is always the one
        // that starts the statement holding `from`.
        let clause = r#"(?:[ \t]*(?:\{[^{}"';]*\}|\*|[\w$]+|,))+[ \t]*"#;
        let named_import = format!(
            r#"\b(?P<keyword>import|export)\b(?P<clause>{})from(?P<ws>\s*){}(?P<semi>;?)"#,
            clause, specifier
        );

        Ok(Some(Self {
            static_import: Regex::new(&static_import)
                .context("Failed to compile static import pattern")?,
            dynamic_import: Regex::new(&dynamic_import)
                .context("Failed to compile dynamic import pattern")?,
            named_import: Regex::new(&named_import)
                .context("Failed to compile named import pattern")?,
        }))
    }

    /// Collect the matches of all three passes against `text`, in pass order.
    pub(crate) fn find_all(&self, text: &str) -> Vec<MatchRecord> {
        let passes = [
            (ImportKind::Static, &self.static_import),
            (ImportKind::Dynamic, &self.dynamic_import),
            (ImportKind::Named, &self.named_import),
        ];

        let mut records = Vec::new();
        for (kind, regex) in passes {
            for caps in regex.captures_iter(text) {
                if let Some(record) = record_from_captures(kind, text, &caps) {
                    trace!("{:?} match at {}: '{}'", kind, record.start, record.specifier());
                    records.push(record);
                }
            }
        }
        records
    }
}

fn record_from_captures(kind: ImportKind, text: &str, caps: &Captures) -> Option<MatchRecord> {
    let whole = caps.get(0)?;
    let quote = caps.name("quote")?;
    let alias = caps.name("alias")?;
    let rest = caps.name("rest");

    // Quotes are single-byte, so the closing quote ends one byte after the specifier
    let specifier_end = rest.map_or(alias.end(), |m| m.end());

    Some(MatchRecord {
        kind,
        start: whole.start(),
        end: whole.end(),
        prefix: text[whole.start()..quote.start()].to_string(),
        quote: quote.as_str().chars().next()?,
        alias: alias.as_str().to_string(),
        remainder: rest
            .map(|m| m.as_str().strip_prefix('/').unwrap_or(m.as_str()).to_string())
            .unwrap_or_default(),
        suffix: text[specifier_end + 1..whole.end()].to_string(),
    })
}

/// Keep the first match claiming each region: earlier passes win, later overlapping
/// matches are dropped. The result is sorted by offset.
pub(crate) fn select_non_overlapping(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut accepted: Vec<MatchRecord> = Vec::with_capacity(records.len());
    for record in records {
        if let Some(winner) = accepted.iter().find(|a| a.overlaps(&record)) {
            debug!(
                "Dropping {:?} match at {} overlapping {:?} match at {}",
                record.kind, record.start, winner.kind, winner.start
            );
            continue;
        }
        accepted.push(record);
    }
    accepted.sort_by_key(|r| r.start);
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(aliases: &[&str]) -> AliasPatterns {
        AliasPatterns::new(aliases.iter().copied()).unwrap().unwrap()
    }

    #[test]
    fn test_no_aliases_disables_patterns() {
        assert!(AliasPatterns::new(std::iter::empty()).unwrap().is_none());
    }

    #[test]
    fn test_static_import_captures() {
        let text = r#"import   "$lib/polyfill/index";"#;
        let records = patterns(&["$lib"]).find_all(text);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.kind, ImportKind::Static);
        assert_eq!(r.prefix, "import   ");
        assert_eq!(r.alias, "$lib");
        assert_eq!(r.remainder, "polyfill/index");
        assert_eq!(r.suffix, ";");
        assert_eq!((r.start, r.end), (0, text.len()));
    }

    #[test]
    fn test_dynamic_import_captures() {
        let text = "const m = await import( '$lib/lazy' );";
        let records = patterns(&["$lib"]).find_all(text);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.kind, ImportKind::Dynamic);
        assert_eq!(r.prefix, "import( ");
        assert_eq!(r.quote, '\'');
        assert_eq!(r.suffix, " );");
        assert_eq!(r.render("./lazy"), "import( './lazy' );");
    }

    #[test]
    fn test_named_import_captures() {
        let text = "import {\n  a,\n  b as c\n} from\t\"@/config\"";
        let records = patterns(&["@"]).find_all(text);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.kind, ImportKind::Named);
        assert_eq!(r.prefix, "import {\n  a,\n  b as c\n} from\t");
        assert_eq!(r.remainder, "config");
        assert_eq!(r.suffix, "");
    }

    #[test]
    fn test_named_import_minified() {
        let text = r#"import{a as b}from"$lib/x";export*from"$lib/y";"#;
        let records = patterns(&["$lib"]).find_all(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prefix, "import{a as b}from");
        assert_eq!(records[1].prefix, "export*from");
        assert_eq!(records[1].remainder, "y");
    }

    #[test]
    fn test_alias_requires_boundary() {
        let text = r#"import a from "$library/x"; import b from "lodash/fp"; import c from "./$lib/x";"#;
        assert!(patterns(&["$lib"]).find_all(text).is_empty());
    }

    #[test]
    fn test_bare_alias_without_remainder() {
        let records = patterns(&["$lib"]).find_all(r#"import x from "$lib";"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].remainder, "");
        assert_eq!(records[0].specifier(), "$lib");
    }

    #[test]
    fn test_longest_alias_wins() {
        let records =
            patterns(&["$lib", "$lib-extra"]).find_all(r#"import x from "$lib-extra/y";"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].alias, "$lib-extra");
    }

    #[test]
    fn test_named_clause_does_not_span_statements() {
        let text = "import React from \"react\";\nimport { x } from \"$lib/util\";";
        let records = patterns(&["$lib"]).find_all(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prefix, "import { x } from ");
    }

    #[test]
    fn test_named_import_ignores_keyword_in_comment() {
        let text = "/**\n * Re-export helpers\n */\nimport { T } from \"$types/model\";\n";
        let records = patterns(&["$types"]).find_all(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start, text.find("import {").unwrap());
        assert_eq!(records[0].prefix, "import { T } from ");
    }

    #[test]
    fn test_named_import_after_statement_without_semicolon() {
        let text = "export const a = 1\nimport { T } from \"$types/model\"\nexport default a\n";
        let records = patterns(&["$types"]).find_all(text);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start, text.find("import {").unwrap());
        assert_eq!(records[0].suffix, "");
    }

    #[test]
    fn test_named_clause_forms() {
        let text = concat!(
            "import x, { a as b } from \"$lib/a\";\n",
            "import * as ns from \"$lib/b\";\n",
            "export * as ns from \"$lib/c\";\n",
            "import type { T } from \"$lib/d\";\n",
        );
        let prefixes: Vec<String> =
            patterns(&["$lib"]).find_all(text).into_iter().map(|r| r.prefix).collect();

        assert_eq!(
            prefixes,
            vec![
                "import x, { a as b } from ",
                "import * as ns from ",
                "export * as ns from ",
                "import type { T } from ",
            ]
        );
    }

    #[test]
    fn test_select_non_overlapping_first_pass_wins() {
        let record = |kind, start, end| MatchRecord {
            kind,
            start,
            end,
            prefix: String::new(),
            quote: '"',
            alias: "$lib".to_string(),
            remainder: String::new(),
            suffix: String::new(),
        };

        let selected = select_non_overlapping(vec![
            record(ImportKind::Static, 40, 60),
            record(ImportKind::Dynamic, 0, 20),
            record(ImportKind::Named, 10, 50),
            record(ImportKind::Named, 70, 90),
        ]);

        let kept: Vec<(ImportKind, usize)> = selected.iter().map(|r| (r.kind, r.start)).collect();
        assert_eq!(
            kept,
            vec![(ImportKind::Dynamic, 0), (ImportKind::Static, 40), (ImportKind::Named, 70)]
        );
    }

    #[test]
    fn test_relative_specifier_pattern() {
        let text = r#"import a from "./a"; import "../b.js"; import('./c'); import d from "react";"#;
        let paths: Vec<&str> = RELATIVE_SPECIFIER
            .captures_iter(text)
            .map(|c| c.name("path").unwrap().as_str())
            .collect();
        assert_eq!(paths, vec!["./a", "../b.js", "./c"]);
    }

    #[test]
    fn test_relative_specifier_skips_from_calls() {
        let text = r#"const a = Array.from("./a"); const b = Buffer.from('./b'); export * from "./c";"#;
        let paths: Vec<&str> = RELATIVE_SPECIFIER
            .captures_iter(text)
            .map(|c| c.name("path").unwrap().as_str())
            .collect();
        assert_eq!(paths, vec!["./c"]);
    }
}
