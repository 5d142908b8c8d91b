//! Expression parsing: a layered precedence climb mirroring the grammar's
//! `logic_or -> logic_and -> rel -> sum -> term -> factor -> primary`
//! chain directly, rather than a single Pratt binding-power table — the
//! grammar has few enough levels that the explicit ladder reads clearer.

use crate::ast::{BinOp, Expression, UnOp};
use crate::Parser;
use ilc_lex::Token;
use ilc_util::Symbol;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Option<Expression> {
        self.parse_logic_or()
    }

    fn parse_logic_or(&mut self) -> Option<Expression> {
        let mut left = self.parse_logic_and()?;
        loop {
            let op = match self.current() {
                Token::Or => BinOp::Or,
                Token::Xor => BinOp::Xor,
                _ => break,
            };
            self.advance();
            let right = self.parse_logic_and()?;
            let span = left.span().to(right.span());
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_logic_and(&mut self) -> Option<Expression> {
        let mut left = self.parse_rel()?;
        while self.at(Token::And) {
            self.advance();
            let right = self.parse_rel()?;
            let span = left.span().to(right.span());
            left = Expression::Binary {
                left: Box::new(left),
                op: BinOp::And,
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_rel(&mut self) -> Option<Expression> {
        let mut left = self.parse_sum()?;
        loop {
            let op = match self.current() {
                Token::Eq => BinOp::Eq,
                Token::NotEq => BinOp::NotEq,
                Token::Less => BinOp::Less,
                Token::LessEq => BinOp::LessEq,
                Token::Greater => BinOp::Greater,
                Token::GreaterEq => BinOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_sum()?;
            let span = left.span().to(right.span());
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_sum(&mut self) -> Option<Expression> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            let span = left.span().to(right.span());
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_term(&mut self) -> Option<Expression> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.current() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            let span = left.span().to(right.span());
            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }
        Some(left)
    }

    fn parse_factor(&mut self) -> Option<Expression> {
        match self.current() {
            Token::Not => {
                let start = self.current_span();
                self.advance();
                let operand = self.parse_factor()?;
                let span = start.to(operand.span());
                Some(Expression::Unary {
                    op: UnOp::Not,
                    operand: Box::new(operand),
                    span,
                })
            }
            Token::Minus => {
                let start = self.current_span();
                self.advance();
                let operand = self.parse_factor()?;
                let span = start.to(operand.span());
                Some(Expression::Unary {
                    op: UnOp::Neg,
                    operand: Box::new(operand),
                    span,
                })
            }
            _ => self.parse_primary(),
        }
    }

    /// `primary := literal | ID | ID '[' expr ']' | ID '.' ID
    ///           | ID '(' arg_list? ')' | '(' expr ')'`, with an optional
    /// trailing `as type` cast applied as a postfix (the grammar lists it
    /// under `primary` but it associates as a suffix on whatever precedes
    /// it).
    fn parse_primary(&mut self) -> Option<Expression> {
        let base = self.parse_primary_atom()?;
        if self.eat(Token::As) {
            let start = base.span();
            let target_type = self.parse_type()?;
            let span = start.to(self.current_span());
            return Some(Expression::TypeCast {
                expr: Box::new(base),
                target_type,
                span,
            });
        }
        Some(base)
    }

    fn parse_primary_atom(&mut self) -> Option<Expression> {
        let span = self.current_span();
        match self.current().clone() {
            Token::IntegerLit(n) => {
                self.advance();
                Some(Expression::IntegerLit(n as i32, span))
            }
            Token::RealLit(n) => {
                self.advance();
                Some(Expression::RealLit(n, span))
            }
            Token::BooleanLit(b) => {
                self.advance();
                Some(Expression::BooleanLit(b, span))
            }
            Token::StringLit(s) => {
                self.advance();
                Some(Expression::StringLit(s, span))
            }
            Token::Ident(name) => {
                self.advance();
                self.parse_ident_trailer(name, span)
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Some(inner)
            }
            other => {
                self.error(&format!("expected an expression, found '{other}'"));
                None
            }
        }
    }

    /// After consuming a bare identifier, decides whether it's a plain
    /// variable reference or the start of `a[i]`, `r.f`, or `f(args)`.
    fn parse_ident_trailer(&mut self, name: Symbol, start: ilc_util::Span) -> Option<Expression> {
        if self.eat(Token::LBracket) {
            let index = self.parse_expr()?;
            self.expect(Token::RBracket)?;
            let span = start.to(self.current_span());
            return Some(Expression::ArrayAccess {
                name,
                index: Box::new(index),
                span,
            });
        }
        if self.eat(Token::Dot) {
            let field = self.expect_ident()?;
            let span = start.to(self.current_span());
            return Some(Expression::RecordAccess {
                record: Box::new(Expression::VarRef(name, start)),
                field,
                span,
            });
        }
        if self.eat(Token::LParen) {
            let args = self.parse_arg_list()?;
            self.expect(Token::RParen)?;
            let span = start.to(self.current_span());
            return Some(Expression::RoutineCall { name, args, span });
        }
        Some(Expression::VarRef(name, start))
    }

    pub(crate) fn parse_arg_list(&mut self) -> Option<Vec<Expression>> {
        let mut args = Vec::new();
        if self.at(Token::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Some(args)
    }
}
