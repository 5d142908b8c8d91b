//! Dead-code elimination: statement-level rewrites bottom-up over
//! routine bodies. Runs after constant folding so `if`/`while`
//! conditions that folded down to a boolean literal are visible here.

use crate::report::{OptimizationDetail, OptimizationKind, OptimizationReport};
use ilc_par::ast::{Expression, Program, Statement};

pub fn dce_stmts(stmts: Program, report: &mut OptimizationReport) -> Program {
    let mut result = Vec::with_capacity(stmts.len());
    let mut terminated = false;
    for stmt in stmts {
        if terminated {
            report.record(OptimizationDetail {
                kind: OptimizationKind::DeadCode,
                description: "statement after an unconditional return is unreachable".to_string(),
                before_text: describe_stmt(&stmt),
                after_text: String::new(),
                line: Some(stmt.span().line),
            });
            continue;
        }
        for expanded in dce_stmt(stmt, report) {
            if matches!(expanded, Statement::ReturnStmt { .. }) {
                terminated = true;
            }
            result.push(expanded);
        }
    }
    result
}

/// Optimizes one statement, possibly expanding it into zero or more
/// replacement statements (an `if` collapse splices in a whole branch).
fn dce_stmt(stmt: Statement, report: &mut OptimizationReport) -> Vec<Statement> {
    match stmt {
        Statement::IfStmt { cond, then_branch, else_branch, span } => match cond {
            Expression::BooleanLit(true, _) => {
                report.record(OptimizationDetail {
                    kind: OptimizationKind::DeadCode,
                    description: "condition is always true; replaced if with its then-branch".to_string(),
                    before_text: "if true then ... end".to_string(),
                    after_text: "<then-branch>".to_string(),
                    line: Some(span.line),
                });
                dce_stmts(then_branch, report)
            }
            Expression::BooleanLit(false, _) => {
                report.record(OptimizationDetail {
                    kind: OptimizationKind::DeadCode,
                    description: "condition is always false; replaced if with its else-branch".to_string(),
                    before_text: "if false then ... end".to_string(),
                    after_text: "<else-branch>".to_string(),
                    line: Some(span.line),
                });
                match else_branch {
                    Some(else_branch) => dce_stmts(else_branch, report),
                    None => Vec::new(),
                }
            }
            _ => vec![Statement::IfStmt {
                cond,
                then_branch: dce_stmts(then_branch, report),
                else_branch: else_branch.map(|b| dce_stmts(b, report)),
                span,
            }],
        },
        Statement::WhileStmt { cond, body, span } => {
            if matches!(cond, Expression::BooleanLit(false, _)) {
                report.record(OptimizationDetail {
                    kind: OptimizationKind::DeadCode,
                    description: "condition is always false; loop body is unreachable".to_string(),
                    before_text: "while false loop ... end".to_string(),
                    after_text: "while false loop end".to_string(),
                    line: Some(span.line),
                });
                vec![Statement::WhileStmt { cond, body: Vec::new(), span }]
            } else {
                vec![Statement::WhileStmt { cond, body: dce_stmts(body, report), span }]
            }
        }
        Statement::ForLoop { var, reverse, start, end, body, span } => vec![Statement::ForLoop {
            var,
            reverse,
            start,
            end,
            body: dce_stmts(body, report),
            span,
        }],
        Statement::RoutineDecl { name, params, return_type, body, span } => vec![Statement::RoutineDecl {
            name,
            params,
            return_type,
            body: dce_stmts(body, report),
            span,
        }],
        other => vec![other],
    }
}

fn describe_stmt(stmt: &Statement) -> String {
    match stmt {
        Statement::VarDecl { name, .. } => format!("var {name} : ...;"),
        Statement::ArrayDecl { name, .. } => format!("var {name} : array ...;"),
        Statement::Assignment { .. } => "<assignment>".to_string(),
        Statement::PrintStmt { .. } => "print(...)".to_string(),
        Statement::ReturnStmt { .. } => "return ...;".to_string(),
        Statement::RoutineCallStmt { name, .. } => format!("{name}(...)"),
        _ => "<statement>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::Span;

    fn ret() -> Statement {
        Statement::ReturnStmt { expr: None, span: Span::DUMMY }
    }

    fn print() -> Statement {
        Statement::PrintStmt { expr: Expression::IntegerLit(1, Span::DUMMY), span: Span::DUMMY }
    }

    #[test]
    fn drops_statements_after_unconditional_return() {
        let mut report = OptimizationReport::default();
        let result = dce_stmts(vec![ret(), print()], &mut report);
        assert_eq!(result.len(), 1);
        assert_eq!(report.count, 1);
    }

    #[test]
    fn collapses_if_true_to_then_branch() {
        let mut report = OptimizationReport::default();
        let stmt = Statement::IfStmt {
            cond: Expression::BooleanLit(true, Span::DUMMY),
            then_branch: vec![print()],
            else_branch: Some(vec![ret()]),
            span: Span::DUMMY,
        };
        let result = dce_stmts(vec![stmt], &mut report);
        assert_eq!(result, vec![print()]);
    }

    #[test]
    fn collapses_if_false_with_no_else_to_nothing() {
        let mut report = OptimizationReport::default();
        let stmt = Statement::IfStmt {
            cond: Expression::BooleanLit(false, Span::DUMMY),
            then_branch: vec![print()],
            else_branch: None,
            span: Span::DUMMY,
        };
        let result = dce_stmts(vec![stmt], &mut report);
        assert!(result.is_empty());
    }

    #[test]
    fn while_false_empties_body() {
        let mut report = OptimizationReport::default();
        let stmt = Statement::WhileStmt {
            cond: Expression::BooleanLit(false, Span::DUMMY),
            body: vec![print()],
            span: Span::DUMMY,
        };
        let result = dce_stmts(vec![stmt], &mut report);
        match &result[0] {
            Statement::WhileStmt { body, .. } => assert!(body.is_empty()),
            _ => panic!("expected while statement"),
        }
    }

    #[test]
    fn leaves_non_constant_if_untouched() {
        let mut report = OptimizationReport::default();
        let stmt = Statement::IfStmt {
            cond: Expression::VarRef(ilc_util::Symbol::intern("flag"), Span::DUMMY),
            then_branch: vec![print()],
            else_branch: None,
            span: Span::DUMMY,
        };
        let result = dce_stmts(vec![stmt.clone()], &mut report);
        assert_eq!(result, vec![stmt]);
        assert_eq!(report.count, 0);
    }
}
