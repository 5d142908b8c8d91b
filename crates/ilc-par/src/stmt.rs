//! Statement dispatch, control flow, assignment, and the built-in
//! `print`/`read` statements.

use crate::ast::{LValue, Statement};
use crate::Parser;
use ilc_lex::Token;

impl<'a> Parser<'a> {
    pub(crate) fn parse_stmt(&mut self) -> Option<Statement> {
        match self.current() {
            Token::Var => self.parse_var_or_array_decl(),
            Token::Type => self.parse_type_decl(),
            Token::Routine => self.parse_routine_decl(),
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::Print => self.parse_print_stmt(),
            Token::Read => self.parse_read_stmt(),
            Token::Return => self.parse_return_stmt(),
            Token::Ident(_) => self.parse_assignment_or_call(),
            other => {
                self.error(&format!("expected a statement, found '{other}'"));
                None
            }
        }
    }

    /// `if_stmt := 'if' expr 'then' stmt_list ('else' stmt_list)? 'end'`
    fn parse_if_stmt(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::If)?;
        let cond = self.parse_expr()?;
        self.expect(Token::Then)?;
        let then_branch = self.parse_stmt_list()?;
        let else_branch = if self.eat(Token::Else) {
            Some(self.parse_stmt_list()?)
        } else {
            None
        };
        self.expect(Token::End)?;
        let span = start.to(self.current_span());
        Some(Statement::IfStmt {
            cond,
            then_branch,
            else_branch,
            span,
        })
    }

    /// `while_stmt := 'while' expr 'loop' stmt_list 'end'`
    fn parse_while_stmt(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::While)?;
        let cond = self.parse_expr()?;
        self.expect(Token::Loop)?;
        let body = self.parse_stmt_list()?;
        self.expect(Token::End)?;
        let span = start.to(self.current_span());
        Some(Statement::WhileStmt { cond, body, span })
    }

    /// `for_stmt := 'for' ID 'in' 'reverse'? expr '..' expr 'loop' stmt_list 'end'`
    fn parse_for_stmt(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::For)?;
        let var = self.expect_ident()?;
        self.expect(Token::In)?;
        let reverse = self.eat(Token::Reverse);
        let range_start = self.parse_expr()?;
        self.expect(Token::DotDot)?;
        let end = self.parse_expr()?;
        self.expect(Token::Loop)?;
        let body = self.parse_stmt_list()?;
        self.expect(Token::End)?;
        let span = start.to(self.current_span());
        Some(Statement::ForLoop {
            var,
            reverse,
            start: range_start,
            end,
            body,
            span,
        })
    }

    /// `print_stmt := 'print' '(' expr ')'`
    fn parse_print_stmt(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::Print)?;
        self.expect(Token::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let span = start.to(self.current_span());
        Some(Statement::PrintStmt { expr, span })
    }

    /// `read_stmt := 'read' '(' ID ')'`
    fn parse_read_stmt(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::Read)?;
        self.expect(Token::LParen)?;
        let var = self.expect_ident()?;
        self.expect(Token::RParen)?;
        let span = start.to(self.current_span());
        Some(Statement::ReadStmt { var, span })
    }

    /// `return_stmt := 'return' expr?`
    fn parse_return_stmt(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.expect(Token::Return)?;
        let expr = if self.at(Token::Semicolon) || self.at(Token::End) || self.at(Token::Eof) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let span = start.to(self.current_span());
        Some(Statement::ReturnStmt { expr, span })
    }

    /// `assignment := lvalue ':=' expr` or a bare `call_stmt := ID '(' arg_list? ')'`.
    ///
    /// Both start with an identifier; the distinguishing token is `:=`
    /// versus `(` once the lvalue's optional `[...]`/`.` suffix (if any)
    /// has been consumed.
    fn parse_assignment_or_call(&mut self) -> Option<Statement> {
        let start = self.current_span();
        let name = self.expect_ident()?;

        if self.eat(Token::LParen) {
            let args = self.parse_arg_list()?;
            self.expect(Token::RParen)?;
            let span = start.to(self.current_span());
            return Some(Statement::RoutineCallStmt { name, args, span });
        }

        let target = if self.eat(Token::LBracket) {
            let index = self.parse_expr()?;
            self.expect(Token::RBracket)?;
            LValue::Index(name, Box::new(index))
        } else if self.eat(Token::Dot) {
            let field = self.expect_ident()?;
            LValue::Field(name, field)
        } else {
            LValue::Var(name)
        };

        self.expect(Token::Assign)?;
        let value = self.parse_expr()?;
        let span = start.to(self.current_span());
        Some(Statement::Assignment {
            target,
            value,
            span,
        })
    }
}
