//! Source positions for declarations.
//!
//! The front-end reports where each declaration was written; the extractor
//! only carries that position through to the emitted document as a
//! `file:line:col` string.
use std::fmt;
use std::sync::Arc;

/// A position in a source file (1-indexed, as compilers report them)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Locations of compiler-introduced entities, which have no file.
    pub fn is_builtin(&self) -> bool {
        self.file.starts_with("<built-in>")
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
