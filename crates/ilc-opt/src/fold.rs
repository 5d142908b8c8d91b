//! Constant folding: a bottom-up rewrite of every expression reachable
//! from the program, collapsing operations on two literals into the
//! computed literal.

use crate::report::{OptimizationDetail, OptimizationKind, OptimizationReport};
use ilc_par::ast::{BinOp, Expression, LValue, Program, Statement, UnOp};
use ilc_util::Span;

pub fn fold_program(stmts: Program, report: &mut OptimizationReport) -> Program {
    stmts.into_iter().map(|s| fold_stmt(s, report)).collect()
}

fn fold_stmt(stmt: Statement, report: &mut OptimizationReport) -> Statement {
    match stmt {
        Statement::VarDecl { name, ty, init, span } => Statement::VarDecl {
            name,
            ty,
            init: init.map(|e| fold_expr(e, report)),
            span,
        },
        Statement::ArrayDecl { .. } | Statement::TypeDecl { .. } | Statement::ReadStmt { .. } => stmt,
        Statement::RoutineDecl { name, params, return_type, body, span } => Statement::RoutineDecl {
            name,
            params,
            return_type,
            body: fold_program(body, report),
            span,
        },
        Statement::Assignment { target, value, span } => Statement::Assignment {
            target: fold_lvalue(target, report),
            value: fold_expr(value, report),
            span,
        },
        Statement::IfStmt { cond, then_branch, else_branch, span } => Statement::IfStmt {
            cond: fold_expr(cond, report),
            then_branch: fold_program(then_branch, report),
            else_branch: else_branch.map(|b| fold_program(b, report)),
            span,
        },
        Statement::WhileStmt { cond, body, span } => Statement::WhileStmt {
            cond: fold_expr(cond, report),
            body: fold_program(body, report),
            span,
        },
        Statement::ForLoop { var, reverse, start, end, body, span } => Statement::ForLoop {
            var,
            reverse,
            start: fold_expr(start, report),
            end: fold_expr(end, report),
            body: fold_program(body, report),
            span,
        },
        Statement::PrintStmt { expr, span } => Statement::PrintStmt { expr: fold_expr(expr, report), span },
        Statement::ReturnStmt { expr, span } => Statement::ReturnStmt {
            expr: expr.map(|e| fold_expr(e, report)),
            span,
        },
        Statement::RoutineCallStmt { name, args, span } => Statement::RoutineCallStmt {
            name,
            args: args.into_iter().map(|a| fold_expr(a, report)).collect(),
            span,
        },
    }
}

fn fold_lvalue(target: LValue, report: &mut OptimizationReport) -> LValue {
    match target {
        LValue::Index(name, index) => LValue::Index(name, Box::new(fold_expr(*index, report))),
        other => other,
    }
}

pub fn fold_expr(expr: Expression, report: &mut OptimizationReport) -> Expression {
    match expr {
        Expression::Unary { op, operand, span } => {
            let operand = fold_expr(*operand, report);
            match fold_unary(op, &operand, span) {
                Some(folded) => {
                    report.record(OptimizationDetail {
                        kind: OptimizationKind::ConstantFold,
                        description: "folded unary operation on a literal".to_string(),
                        before_text: format!("{} {}", unop_text(op), literal_text(&operand)),
                        after_text: literal_text(&folded),
                        line: Some(span.line),
                    });
                    folded
                }
                None => Expression::Unary { op, operand: Box::new(operand), span },
            }
        }
        Expression::Binary { left, op, right, span } => {
            let left = fold_expr(*left, report);
            let right = fold_expr(*right, report);
            match fold_binary(&left, op, &right, span) {
                Some(folded) => {
                    report.record(OptimizationDetail {
                        kind: OptimizationKind::ConstantFold,
                        description: "folded a constant expression".to_string(),
                        before_text: format!("{} {} {}", literal_text(&left), binop_text(op), literal_text(&right)),
                        after_text: literal_text(&folded),
                        line: Some(span.line),
                    });
                    folded
                }
                None => Expression::Binary { left: Box::new(left), op, right: Box::new(right), span },
            }
        }
        Expression::ArrayAccess { name, index, span } => Expression::ArrayAccess {
            name,
            index: Box::new(fold_expr(*index, report)),
            span,
        },
        Expression::RecordAccess { record, field, span } => Expression::RecordAccess {
            record: Box::new(fold_expr(*record, report)),
            field,
            span,
        },
        Expression::RoutineCall { name, args, span } => Expression::RoutineCall {
            name,
            args: args.into_iter().map(|a| fold_expr(a, report)).collect(),
            span,
        },
        Expression::TypeCast { expr: inner, target_type, span } => Expression::TypeCast {
            expr: Box::new(fold_expr(*inner, report)),
            target_type,
            span,
        },
        literal => literal,
    }
}

fn fold_unary(op: UnOp, operand: &Expression, span: Span) -> Option<Expression> {
    match (op, operand) {
        (UnOp::Neg, Expression::IntegerLit(n, _)) => Some(Expression::IntegerLit(-n, span)),
        (UnOp::Neg, Expression::RealLit(n, _)) => Some(Expression::RealLit(-n, span)),
        (UnOp::Not, Expression::BooleanLit(b, _)) => Some(Expression::BooleanLit(!b, span)),
        _ => None,
    }
}

/// Returns the literal's numeric value as `f64` plus whether it was an
/// integer literal (so arithmetic on two integers can stay integral).
fn numeric_literal(expr: &Expression) -> Option<(f64, bool)> {
    match expr {
        Expression::IntegerLit(n, _) => Some((*n as f64, true)),
        Expression::RealLit(n, _) => Some((*n, false)),
        _ => None,
    }
}

fn fold_binary(left: &Expression, op: BinOp, right: &Expression, span: Span) -> Option<Expression> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            let (lv, l_int) = numeric_literal(left)?;
            let (rv, r_int) = numeric_literal(right)?;
            if matches!(op, BinOp::Div | BinOp::Mod) && rv == 0.0 {
                return None;
            }
            let result = match op {
                BinOp::Add => lv + rv,
                BinOp::Sub => lv - rv,
                BinOp::Mul => lv * rv,
                BinOp::Div if l_int && r_int => ((lv as i64) / (rv as i64)) as f64,
                BinOp::Div => lv / rv,
                BinOp::Mod if l_int && r_int => ((lv as i64) % (rv as i64)) as f64,
                BinOp::Mod => lv % rv,
                _ => unreachable!(),
            };
            if l_int && r_int {
                Some(Expression::IntegerLit(result as i32, span))
            } else {
                Some(Expression::RealLit(result, span))
            }
        }
        BinOp::Eq | BinOp::NotEq | BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
            let (lv, _) = numeric_literal(left)?;
            let (rv, _) = numeric_literal(right)?;
            let result = match op {
                BinOp::Eq => lv == rv,
                BinOp::NotEq => lv != rv,
                BinOp::Less => lv < rv,
                BinOp::LessEq => lv <= rv,
                BinOp::Greater => lv > rv,
                BinOp::GreaterEq => lv >= rv,
                _ => unreachable!(),
            };
            Some(Expression::BooleanLit(result, span))
        }
        BinOp::And | BinOp::Or | BinOp::Xor => {
            let (Expression::BooleanLit(lb, _), Expression::BooleanLit(rb, _)) = (left, right) else {
                return None;
            };
            let result = match op {
                BinOp::And => *lb && *rb,
                BinOp::Or => *lb || *rb,
                BinOp::Xor => *lb ^ *rb,
                _ => unreachable!(),
            };
            Some(Expression::BooleanLit(result, span))
        }
    }
}

fn literal_text(expr: &Expression) -> String {
    match expr {
        Expression::IntegerLit(n, _) => n.to_string(),
        Expression::RealLit(n, _) => n.to_string(),
        Expression::BooleanLit(b, _) => b.to_string(),
        Expression::StringLit(s, _) => format!("{s:?}"),
        _ => "<expr>".to_string(),
    }
}

fn binop_text(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Eq => "=",
        BinOp::NotEq => "/=",
        BinOp::Less => "<",
        BinOp::LessEq => "<=",
        BinOp::Greater => ">",
        BinOp::GreaterEq => ">=",
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::Xor => "xor",
    }
}

fn unop_text(op: UnOp) -> &'static str {
    match op {
        UnOp::Neg => "-",
        UnOp::Not => "not",
    }
}
