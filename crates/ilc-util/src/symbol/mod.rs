//! Symbol module - string interning for identifiers and string literals.
//!
//! A [`Symbol`] is a 4-byte handle into a global string table. Interning
//! keeps AST nodes cheap to copy and compare: two identifiers with the
//! same spelling always compare equal in O(1), without touching the
//! underlying bytes.

mod interner;

pub use interner::Interner;

use std::fmt;

/// An interned string identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern `s`, returning a handle that compares equal for any other
    /// interning of the same text.
    pub fn intern(s: &str) -> Self {
        interner::with_interner(|i| i.intern(s))
    }

    /// Look up the original text. Panics if `self` was not produced by
    /// [`Symbol::intern`] in this process (there is no other way to
    /// construct one).
    pub fn as_str(&self) -> &'static str {
        interner::with_interner(|i| i.resolve(*self))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! predeclared {
    ($($const_name:ident => $text:expr),* $(,)?) => {
        /// Built-in keyword and type-name symbols, interned once at
        /// first use so every crate can refer to them without re-interning.
        #[allow(non_upper_case_globals)]
        pub mod kw {
            use super::Symbol;
            $(
                pub fn $const_name() -> Symbol {
                    Symbol::intern($text)
                }
            )*
        }
    };
}

predeclared! {
    integer => "integer",
    real => "real",
    boolean => "boolean",
    string => "string",
    void => "void",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = Symbol::intern("routine");
        let b = Symbol::intern("routine");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "routine");
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let a = Symbol::intern("x");
        let b = Symbol::intern("y");
        assert_ne!(a, b);
    }

    #[test]
    fn keyword_helpers_roundtrip() {
        assert_eq!(kw::integer().as_str(), "integer");
        assert_eq!(kw::void().as_str(), "void");
    }
}
