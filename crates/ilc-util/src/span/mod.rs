//! Span module - source location tracking.
//!
//! A [`Span`] identifies a byte range in a single source file. Spans
//! carry redundant line/column information so the lexer and parser never
//! need to re-scan the source to report a diagnostic.

mod source_map;

pub use source_map::{SourceFile, SourceMap};

/// Identifies one file registered with a [`SourceMap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl crate::index_vec::Idx for FileId {
    fn from_usize(idx: usize) -> Self {
        FileId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A range of source text, plus the 1-based line/column of its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub file: FileId,
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const DUMMY: Span = Span {
        file: FileId(0),
        start: 0,
        end: 0,
        line: 0,
        column: 0,
    };

    pub fn new(file: FileId, start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            file,
            start,
            end,
            line,
            column,
        }
    }

    /// A zero-width span at a single point, useful for "insert here"
    /// diagnostics (e.g. an implied auto-declared loop variable).
    pub fn point(file: FileId, offset: usize, line: u32, column: u32) -> Self {
        Self::new(file, offset, offset, line, column)
    }

    /// The smallest span covering both `self` and `other`. Both must
    /// belong to the same file; line/column are taken from whichever
    /// span starts first.
    pub fn to(&self, other: Span) -> Span {
        if self.start <= other.start {
            Span {
                file: self.file,
                start: self.start,
                end: other.end.max(self.end),
                line: self.line,
                column: self.column,
            }
        } else {
            other.to(*self)
        }
    }
}
