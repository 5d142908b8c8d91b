//! Source map: random-access over loaded source files with line/column
//! translation, used by the lexer (to stamp spans) and the driver (to
//! render `^^^^` snippets under diagnostics).

use super::{FileId, Span};
use crate::index_vec::IndexVec;

/// One loaded source file plus a precomputed table of line-start offsets.
pub struct SourceFile {
    pub name: String,
    pub content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    fn new(name: String, content: String) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            name,
            content,
            line_starts,
        }
    }

    /// Translate a byte offset into a 1-based (line, column) pair.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_idx];
        let column = self.content[line_start..offset.min(self.content.len())]
            .chars()
            .count()
            + 1;
        (line_idx as u32 + 1, column as u32)
    }

    /// The full text of the 1-based line `line`, without its terminator.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line as usize).saturating_sub(1);
        let start = self.line_starts.get(idx).copied().unwrap_or(self.content.len());
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e.saturating_sub(1))
            .unwrap_or(self.content.len());
        self.content[start..end.max(start)].trim_end_matches('\r')
    }

    /// The source text covered by `span`, clamped to this file's length.
    pub fn snippet(&self, span: Span) -> &str {
        let end = span.end.min(self.content.len());
        let start = span.start.min(end);
        &self.content[start..end]
    }
}

/// A registry of source files, indexed by [`FileId`] in registration order.
#[derive(Default)]
pub struct SourceMap {
    files: IndexVec<FileId, SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: IndexVec::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> FileId {
        self.files.push(SourceFile::new(name.into(), content.into()))
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        self.files.get(id).expect("FileId was never registered with this SourceMap")
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files.iter_enumerated()
    }
}
