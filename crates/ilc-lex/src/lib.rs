//! ilc-lex - lexical analysis for IL source text.
//!
//! Turns a source string into a stream of [`Token`]s, reporting lexical
//! errors (illegal characters, unterminated strings, malformed numbers)
//! through a shared [`ilc_util::Handler`] and continuing to scan past them
//! rather than aborting.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::Token;
