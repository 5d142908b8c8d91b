//! ilc-par - recursive-descent parser and AST for the IL language.
//!
//! Reduces a token stream into a [`Program`] via a hand-written
//! recursive-descent parser with a layered precedence climb for
//! expressions (`logic_or` -> `logic_and` -> `rel` -> `sum` -> `term`
//! -> `factor` -> `primary`). On the first syntax error the parser emits
//! one diagnostic and returns `None`; there is no panic-mode recovery.

pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;

pub use ast::*;

use ilc_lex::{Lexer, Token};
use ilc_util::diagnostic::{DiagnosticBuilder, Kind};
use ilc_util::{FileId, Handler, Span};

/// Parses `source` into a [`Program`], or `None` if a syntax error was
/// encountered (the error itself is reported through `handler`).
pub fn parse(source: &str, file: FileId, handler: &Handler) -> Option<Program> {
    let mut lexer = Lexer::new(source, file, handler);
    let mut tokens = Vec::new();
    loop {
        let (tok, span) = lexer.next_spanned();
        let is_eof = tok == Token::Eof;
        tokens.push((tok, span));
        if is_eof {
            break;
        }
    }
    Parser::new(tokens, handler).parse_program()
}

/// Recursive-descent parser over a pre-lexed token buffer.
pub struct Parser<'a> {
    tokens: Vec<(Token, Span)>,
    position: usize,
    handler: &'a Handler,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<(Token, Span)>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
            failed: false,
        }
    }

    /// Parses a full program: a `;`-separated statement list ending at EOF.
    pub fn parse_program(&mut self) -> Option<Program> {
        let stmts = self.parse_stmt_list()?;
        if !self.at(Token::Eof) {
            self.error(&format!("unexpected token '{}'", self.current()));
            return None;
        }
        Some(stmts)
    }

    /// Parses a `;`-separated run of statements, stopping at `end`,
    /// `else`, or end-of-file without consuming that terminator.
    pub(crate) fn parse_stmt_list(&mut self) -> Option<Vec<Statement>> {
        let mut stmts = Vec::new();
        while !self.failed && !self.at_block_end() {
            stmts.push(self.parse_stmt()?);
            if !self.eat(Token::Semicolon) && !self.at_block_end() {
                self.error(&format!("expected ';', found '{}'", self.current()));
                return None;
            }
        }
        if self.failed {
            None
        } else {
            Some(stmts)
        }
    }

    fn at_block_end(&self) -> bool {
        matches!(self.current(), Token::Eof | Token::End | Token::Else)
    }

    pub(crate) fn current(&self) -> &Token {
        self.tokens
            .get(self.position)
            .map(|(t, _)| t)
            .unwrap_or(&Token::Eof)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.position)
            .map(|(_, s)| *s)
            .unwrap_or(Span::DUMMY)
    }

    pub(crate) fn at(&self, tok: Token) -> bool {
        *self.current() == tok
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !matches!(tok, Token::Eof) {
            self.position += 1;
        }
        tok
    }

    /// Consumes the current token if it matches, returning whether it did.
    pub(crate) fn eat(&mut self, tok: Token) -> bool {
        if self.at(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token, which must match, or fails the parse.
    pub(crate) fn expect(&mut self, tok: Token) -> Option<()> {
        if self.at(tok.clone()) {
            self.advance();
            Some(())
        } else {
            self.error(&format!("expected '{tok}', found '{}'", self.current()));
            None
        }
    }

    /// Consumes the current token, which must be `Token::Ident(_)`,
    /// returning the interned name.
    pub(crate) fn expect_ident(&mut self) -> Option<ilc_util::Symbol> {
        match self.current().clone() {
            Token::Ident(sym) => {
                self.advance();
                Some(sym)
            }
            other => {
                self.error(&format!("expected identifier, found '{other}'"));
                None
            }
        }
    }

    /// Emits one syntax diagnostic and poisons the parser so no further
    /// productions are attempted (spec.md's explicit non-goal: no
    /// panic-mode recovery).
    pub(crate) fn error(&mut self, message: &str) {
        if self.failed {
            return;
        }
        self.failed = true;
        DiagnosticBuilder::error(Kind::Syntactic, message.to_string())
            .span(self.current_span())
            .emit(self.handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::{FileId, Handler};

    fn parse_ok(src: &str) -> Program {
        let handler = Handler::new();
        let program = parse(src, FileId(0), &handler);
        assert!(!handler.has_errors(), "unexpected errors: {:?}", handler.diagnostics());
        program.expect("expected a program")
    }

    fn parse_err(src: &str) {
        let handler = Handler::new();
        let program = parse(src, FileId(0), &handler);
        assert!(program.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn empty_program_parses() {
        let program = parse_ok("");
        assert!(program.is_empty());
    }

    #[test]
    fn trailing_semicolon_is_optional() {
        let a = parse_ok("var x : integer is 1;");
        let b = parse_ok("var x : integer is 1");
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn missing_semicolon_between_statements_is_an_error() {
        parse_err("var x : integer is 1 var y : integer is 2;");
    }

    #[test]
    fn garbage_token_is_a_syntax_error() {
        parse_err("var x : integer is @;");
    }
}
