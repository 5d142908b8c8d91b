//! Fluent construction of [`super::Diagnostic`] values.

use super::{Diagnostic, Handler, Kind, Level};
use crate::Span;

/// Builder for a diagnostic, following the same `::error(...)` /
/// `::warning(...)` entry points every pipeline stage uses to report
/// through its [`Handler`].
pub struct DiagnosticBuilder {
    level: Level,
    kind: Kind,
    message: String,
    span: Span,
    notes: Vec<String>,
    helps: Vec<String>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, kind: Kind, message: impl Into<String>) -> Self {
        Self {
            level,
            kind,
            message: message.into(),
            span: Span::DUMMY,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    pub fn error(kind: Kind, message: impl Into<String>) -> Self {
        Self::new(Level::Error, kind, message)
    }

    pub fn warning(kind: Kind, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, kind, message)
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            kind: self.kind,
            message: self.message,
            span: self.span,
            notes: self.notes,
            helps: self.helps,
        }
    }

    /// Build and emit to `handler` in one step.
    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_error_defaults_to_dummy_span() {
        let d = DiagnosticBuilder::error(Kind::Lexical, "bad char").build();
        assert_eq!(d.level, Level::Error);
        assert_eq!(d.span, Span::DUMMY);
    }

    #[test]
    fn builder_collects_notes_and_helps() {
        let d = DiagnosticBuilder::warning(Kind::Semantic, "unused variable `x`")
            .note("declared on line 3")
            .help("remove the declaration or use the variable")
            .build();
        assert_eq!(d.notes, vec!["declared on line 3"]);
        assert_eq!(d.helps, vec!["remove the declaration or use the variable"]);
    }

    #[test]
    fn builder_emit_reaches_handler() {
        let handler = Handler::new();
        DiagnosticBuilder::error(Kind::CodeGen, "missing assembler")
            .span(Span::DUMMY)
            .emit(&handler);
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
    }
}
