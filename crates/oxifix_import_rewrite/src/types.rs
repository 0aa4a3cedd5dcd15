/// An aliased import that could not be rewritten and was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAlias {
    pub alias: String,
    /// Byte offset of the import statement in the original text
    pub offset: usize,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub replaced: usize,
    pub removed: usize,
    pub extensions_fixed: usize,
    pub unresolved: Vec<UnresolvedAlias>,
}

impl RewriteOutcome {
    pub fn changes(&self) -> usize {
        self.replaced + self.removed + self.extensions_fixed
    }

    pub fn is_changed(&self) -> bool {
        self.changes() > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files with at least one change
    pub processed: usize,
    /// Allowed files that needed no change
    pub unchanged: usize,
    /// Files skipped because of their extension
    pub ignored: usize,
    /// Files that could not be read or written
    pub failed: usize,
    pub changes: usize,
    pub unresolved: usize,
}
