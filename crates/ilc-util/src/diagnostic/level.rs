//! Diagnostic severity and the four diagnostic kinds the compiler reports.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl Level {
    pub fn is_error(self) -> bool {
        self == Level::Error
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        };
        f.write_str(s)
    }
}

/// Which pipeline stage produced the diagnostic. Printed as the
/// `<kind>:` prefix of every user-visible error line (spec §7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Lexical,
    Syntactic,
    Semantic,
    CodeGen,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Lexical => "lexical",
            Kind::Syntactic => "syntax",
            Kind::Semantic => "semantic",
            Kind::CodeGen => "codegen",
        };
        f.write_str(s)
    }
}
