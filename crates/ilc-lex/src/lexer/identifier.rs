//! Identifier and keyword scanning.

use ilc_util::Symbol;

use super::core::{is_ident_continue, Lexer};
use crate::token::{keyword, Token};

impl<'a> Lexer<'a> {
    pub(super) fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let word = self.cursor.slice_from(start);
        keyword(word).unwrap_or_else(|| Token::Ident(Symbol::intern(word)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::{FileId, Handler};

    fn lex_one(src: &str) -> Token {
        let handler = Handler::new();
        Lexer::new(src, FileId(0), &handler).next_token()
    }

    #[test]
    fn plain_identifier_interns_as_ident() {
        match lex_one("my_var") {
            Token::Ident(s) => assert_eq!(s.as_str(), "my_var"),
            other => panic!("expected Ident, got {other:?}"),
        }
    }

    #[test]
    fn reserved_word_becomes_keyword_token() {
        assert_eq!(lex_one("routine"), Token::Routine);
        assert_eq!(lex_one("true"), Token::BooleanLit(true));
        assert_eq!(lex_one("false"), Token::BooleanLit(false));
    }

    #[test]
    fn underscore_prefixed_identifier_is_allowed() {
        match lex_one("_hidden") {
            Token::Ident(s) => assert_eq!(s.as_str(), "_hidden"),
            other => panic!("expected Ident, got {other:?}"),
        }
    }
}
