//! Line/column source locations.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A point in an input file, as reported by the annotation collector.
///
/// Lines and columns are 1-based; `0` means "unknown".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
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

    /// A location for synthesized declarations (natives, externs).
    pub fn synthetic() -> Self {
        Self::new("<native>", 0, 0)
    }

    pub fn is_synthetic(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
