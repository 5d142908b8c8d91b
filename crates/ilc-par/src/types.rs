//! Type syntax: `type_body := simple_type | 'record' var_decl* 'end' | 'array' '[' INT ']' type`.

use crate::ast::{RecordField, TypeExpr};
use crate::Parser;
use ilc_lex::Token;
use ilc_util::Symbol;

impl<'a> Parser<'a> {
    /// `type := simple_type | 'array' '[' INT ']' type`
    ///
    /// Record bodies are only legal directly after `type NAME is`, so
    /// they are parsed by [`Self::parse_type_body`] rather than here.
    pub(crate) fn parse_type(&mut self) -> Option<TypeExpr> {
        if self.eat(Token::Array) {
            self.expect(Token::LBracket)?;
            let size = self.expect_int_literal()?;
            self.expect(Token::RBracket)?;
            let element = self.parse_type()?;
            return Some(TypeExpr::Array {
                element: Box::new(element),
                size,
            });
        }
        self.parse_simple_type()
    }

    /// The full right-hand side of a `type NAME is <type_body>` declaration.
    pub(crate) fn parse_type_body(&mut self) -> Option<TypeExpr> {
        if self.eat(Token::Record) {
            let mut fields = Vec::new();
            while !self.at(Token::End) {
                self.expect(Token::Var)?;
                let name = self.expect_ident()?;
                self.expect(Token::Colon)?;
                let ty = self.parse_type()?;
                fields.push(RecordField { name, ty });
                self.expect(Token::Semicolon)?;
            }
            self.expect(Token::End)?;
            return Some(TypeExpr::Record(fields));
        }
        self.parse_type()
    }

    fn parse_simple_type(&mut self) -> Option<TypeExpr> {
        let name = match self.current().clone() {
            Token::IntegerKw => Symbol::intern("integer"),
            Token::RealKw => Symbol::intern("real"),
            Token::BooleanKw => Symbol::intern("boolean"),
            Token::StringKw => Symbol::intern("string"),
            Token::VoidKw => Symbol::intern("void"),
            Token::Ident(sym) => sym,
            other => {
                self.error(&format!("expected a type, found '{other}'"));
                return None;
            }
        };
        self.advance();
        Some(TypeExpr::Simple(name))
    }

    /// Reads an integer literal used as a fixed array size.
    pub(crate) fn expect_int_literal(&mut self) -> Option<i32> {
        match self.current().clone() {
            Token::IntegerLit(n) => {
                self.advance();
                Some(n as i32)
            }
            other => {
                self.error(&format!("expected an integer literal, found '{other}'"));
                None
            }
        }
    }
}
