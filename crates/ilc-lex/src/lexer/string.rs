//! String literal scanning.

use super::core::Lexer;
use crate::token::Token;

impl<'a> Lexer<'a> {
    pub(super) fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening '"'
        let mut value = String::new();
        loop {
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    return Token::StringLit(value);
                }
                '\0' if self.cursor.is_at_end() => {
                    self.report_error("unterminated string literal");
                    return Token::Invalid(value);
                }
                '\n' => {
                    self.report_error("unterminated string literal");
                    return Token::Invalid(value);
                }
                '\\' => {
                    self.cursor.advance();
                    match self.cursor.current_char() {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        'b' => value.push('\u{8}'),
                        'f' => value.push('\u{c}'),
                        c => {
                            self.report_error(format!("unknown escape sequence '\\{c}'"));
                            value.push(c);
                        }
                    }
                    self.cursor.advance();
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::{FileId, Handler};

    fn lex_one(src: &str) -> (Token, bool) {
        let handler = Handler::new();
        let mut lexer = Lexer::new(src, FileId(0), &handler);
        let tok = lexer.next_token();
        (tok, handler.has_errors())
    }

    #[test]
    fn plain_string() {
        let (tok, errs) = lex_one("\"hello\"");
        assert_eq!(tok, Token::StringLit("hello".to_string()));
        assert!(!errs);
    }

    #[test]
    fn escape_sequences_decode() {
        let (tok, errs) = lex_one(r#""a\nb\tc\"d""#);
        assert_eq!(tok, Token::StringLit("a\nb\tc\"d".to_string()));
        assert!(!errs);
    }

    #[test]
    fn unterminated_string_reports_and_recovers() {
        let (tok, errs) = lex_one("\"abc");
        assert!(matches!(tok, Token::Invalid(_)));
        assert!(errs);
    }

    #[test]
    fn newline_inside_string_is_unterminated() {
        let (tok, errs) = lex_one("\"abc\ndef\"");
        assert!(matches!(tok, Token::Invalid(_)));
        assert!(errs);
    }
}
