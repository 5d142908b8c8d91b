//! Operators that need one character of lookahead to disambiguate, plus
//! `/` (division vs. the start of a `//` comment, and `/=`).

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    /// `<` or `>` followed optionally by `=`.
    pub(super) fn lex_two_char(&mut self, second: char, one: Token, two: Token) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == second {
            self.cursor.advance();
            two
        } else {
            one
        }
    }

    /// `<`, `<=`, or the dialect's alternate not-equal spelling `<>`.
    pub(super) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => {
                self.cursor.advance();
                Token::LessEq
            }
            '>' => {
                self.cursor.advance();
                Token::NotEq
            }
            _ => Token::Less,
        }
    }

    /// `!=`, the dialect's alternate not-equal spelling alongside `/=`.
    pub(super) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            Token::NotEq
        } else {
            self.cursor.advance();
            self.report_error("unexpected character '!'");
            Token::Invalid("!".to_string())
        }
    }

    pub(super) fn lex_slash_or_comment(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            Token::NotEq
        } else {
            Token::Slash
        }
    }

    pub(super) fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            Token::Assign
        } else {
            Token::Colon
        }
    }

    pub(super) fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            Token::DotDot
        } else {
            Token::Dot
        }
    }
}
