//! Integer and real literal scanning.
//!
//! Literals are always lexed non-negative; a leading `-` is unary minus in
//! the grammar, not part of the literal (this avoids the lexer and parser
//! both claiming ownership of the sign).

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    pub(super) fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_real = false;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_real = true;
            self.cursor.advance(); // '.'
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(start);
        if is_real {
            match text.parse::<f64>() {
                Ok(v) => Token::RealLit(v),
                Err(_) => {
                    self.report_error(format!("invalid real literal '{text}'"));
                    Token::Invalid(text.to_string())
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => Token::IntegerLit(v),
                Err(_) => {
                    self.report_error(format!("integer literal '{text}' out of range"));
                    Token::Invalid(text.to_string())
                }
            }
        }
    }
}
