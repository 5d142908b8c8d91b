//! Declaration syntax: `var_decl`, `array_decl`, `type_decl`, `routine_decl`.

use crate::ast::{Param, Statement};
use crate::Parser;
use ilc_lex::Token;

impl<'a> Parser<'a> {
    /// `var_decl := 'var' ID ':' type ('is' expr)?`
    /// `array_decl := 'var' ID ':' 'array' '[' INT ']' type`
    ///
    /// Both productions start identically; an array decl is recognized
    /// by the `array` keyword appearing where a type is expected.
    pub(crate) fn parse_var_or_array_decl(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::Var)?;
        let name = self.expect_ident()?;
        self.expect(Token::Colon)?;

        if self.at(Token::Array) {
            let ty = self.parse_type()?;
            let span = start.to(self.current_span());
            return Some(Statement::ArrayDecl { name, ty, span });
        }

        let ty = self.parse_type()?;
        let init = if self.eat(Token::Is) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = start.to(self.current_span());
        Some(Statement::VarDecl {
            name,
            ty,
            init,
            span,
        })
    }

    /// `type_decl := 'type' ID 'is' type_body`
    pub(crate) fn parse_type_decl(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::Type)?;
        let name = self.expect_ident()?;
        self.expect(Token::Is)?;
        let ty = self.parse_type_body()?;
        let span = start.to(self.current_span());
        Some(Statement::TypeDecl { name, ty, span })
    }

    /// `routine_decl := 'routine' ID '(' params? ')' (':' type)? 'is' stmt_list 'end'`
    pub(crate) fn parse_routine_decl(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::Routine)?;
        let name = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;

        let return_type = if self.eat(Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.expect(Token::Is)?;
        let body = self.parse_stmt_list()?;
        self.expect(Token::End)?;
        let span = start.to(self.current_span());
        Some(Statement::RoutineDecl {
            name,
            params,
            return_type,
            body,
            span,
        })
    }

    /// `params := ID ':' type (',' ID ':' type)*`
    fn parse_params(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.at(Token::RParen) {
            return Some(params);
        }
        loop {
            let name = self.expect_ident()?;
            self.expect(Token::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param { name, ty });
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Some(params)
    }
}
