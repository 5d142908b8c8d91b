//! Diagnostic module - error and warning reporting infrastructure.
//!
//! Every diagnostic carries a [`Level`] (error/warning/note) and a [`Kind`]
//! naming which pipeline stage produced it. The driver renders each as one
//! `<kind>: <message>` line on stderr; this module only builds and collects
//! them.
//!
//! ```
//! use ilc_util::diagnostic::{DiagnosticBuilder, Handler, Kind};
//! use ilc_util::Span;
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error(Kind::Syntactic, "expected ';'")
//!     .span(Span::DUMMY)
//!     .emit(&handler);
//!
//! assert!(handler.has_errors());
//! ```

mod builder;
mod level;

pub use builder::DiagnosticBuilder;
pub use level::{Kind, Level};

use crate::Span;
use std::cell::RefCell;

/// A single diagnostic message with severity, kind and source location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub kind: Kind,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
}

impl Diagnostic {
    pub fn new(level: Level, kind: Kind, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
            span,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    pub fn error(kind: Kind, message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, kind, message, span)
    }

    pub fn warning(kind: Kind, message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, kind, message, span)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    /// The line the driver prints on stderr per the error handling design.
    pub fn render(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }
}

/// Collects diagnostics emitted while running one pipeline stage.
///
/// A `Handler` never aborts on its own; callers decide whether to keep
/// going after an error is recorded. The semantic analyzer keeps running
/// every pass to report every violation it finds; the parser stops after
/// the first syntax error.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level.is_error())
            .count()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}
