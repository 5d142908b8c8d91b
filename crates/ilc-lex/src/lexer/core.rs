//! Core lexer implementation: dispatch from the current character to the
//! right per-category scanner.

use ilc_util::diagnostic::{DiagnosticBuilder, Kind};
use ilc_util::{FileId, Handler, Span};

use crate::cursor::Cursor;
use crate::token::Token;

use super::comment;

/// Scans IL source text into a stream of [`Token`]s.
///
/// Never panics on malformed input: an illegal character or unterminated
/// string is reported through `handler` and replaced with
/// [`Token::Invalid`], and scanning resumes on the next character.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) file: FileId,
    pub(crate) handler: &'a Handler,
    pub(crate) token_start: usize,
    pub(crate) token_start_line: u32,
    pub(crate) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: FileId, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            file,
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or [`Token::Eof`] once the source is
    /// exhausted. Every call first starts a fresh token span at the
    /// current cursor position.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::Eof;
        }

        match self.cursor.current_char() {
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '%' => self.lex_percent(),
            '/' => self.lex_slash_or_comment(),
            '=' => self.single(Token::Eq),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_two_char('=', Token::Greater, Token::GreaterEq),
            ':' => self.lex_colon(),
            '.' => self.lex_dot(),
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),
            c => {
                self.cursor.advance();
                self.report_error(format!("unexpected character '{c}'"));
                Token::Invalid(c.to_string())
            }
        }
    }

    /// Like [`Self::next_token`], but also returns the span of the token
    /// just scanned. Used by the parser, which needs spans on every AST
    /// node rather than just on diagnostics.
    pub fn next_spanned(&mut self) -> (Token, Span) {
        let tok = self.next_token();
        (tok, self.span())
    }

    fn single(&mut self, tok: Token) -> Token {
        self.cursor.advance();
        tok
    }

    /// `%` is the modulo operator, but directly abutting an identifier
    /// (`%foo`) is flagged rather than silently tokenized as `%` then
    /// `foo` — it is far more likely a typo than two adjacent tokens.
    fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if is_ident_start(self.cursor.current_char()) {
            self.report_error("'%' directly followed by an identifier");
        }
        Token::Percent
    }

    pub(crate) fn span(&self) -> Span {
        Span::new(
            self.file,
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    pub(crate) fn report_error(&mut self, message: impl Into<String>) {
        DiagnosticBuilder::error(Kind::Lexical, message)
            .span(self.span())
            .emit(self.handler);
    }

    fn skip_trivia(&mut self) {
        loop {
            self.cursor.skip_whitespace();
            let c = self.cursor.current_char();
            if c == '#' || (c == '/' && self.cursor.peek_char(1) == '/') {
                comment::skip_line_comment(&mut self.cursor);
                continue;
            }
            break;
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::Eof => None,
            tok => Some(tok),
        }
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::{FileId, Handler};

    fn tokens(src: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(src, FileId(0), &handler);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            if tok == Token::Eof {
                break;
            }
            out.push(tok);
        }
        out
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let toks = tokens("  // a comment\n  var");
        assert_eq!(toks, vec![Token::Var]);
    }

    #[test]
    fn dispatches_punctuation() {
        let toks = tokens("( ) [ ] , ;");
        assert_eq!(
            toks,
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
                Token::Comma,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn unexpected_character_reports_and_resumes() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("@ var", FileId(0), &handler);
        let first = lexer.next_token();
        assert!(matches!(first, Token::Invalid(_)));
        assert_eq!(lexer.next_token(), Token::Var);
        assert!(handler.has_errors());
    }

    #[test]
    fn percent_abutting_identifier_is_flagged() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("%foo", FileId(0), &handler);
        assert_eq!(lexer.next_token(), Token::Percent);
        assert!(handler.has_errors());
    }

    #[test]
    fn percent_as_operator_is_not_flagged() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("a % b", FileId(0), &handler);
        lexer.next_token();
        assert_eq!(lexer.next_token(), Token::Percent);
        assert!(!handler.has_errors());
    }

    #[test]
    fn eof_is_returned_at_end_of_source() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("", FileId(0), &handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert_eq!(lexer.next_token(), Token::Eof);
    }
}
