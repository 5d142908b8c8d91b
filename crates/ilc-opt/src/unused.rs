//! Unused-variable elimination. Collects every name that appears in a
//! "use" position (a conservative, assignment-counts-as-use notion,
//! per the source semantics) and drops declarations that are never
//! read or written.

use crate::report::{OptimizationDetail, OptimizationKind, OptimizationReport};
use ilc_par::ast::{Expression, LValue, Program, Statement};
use ilc_util::{FxHashSet, Symbol};

pub fn strip_unused_vars(program: Program, report: &mut OptimizationReport) -> Program {
    let full_used = collect_used(&program, true);
    let top_level_used = collect_used(&program, false);
    strip_top_level(program, &full_used, &top_level_used, report)
}

fn strip_top_level(
    stmts: Program,
    full_used: &FxHashSet<Symbol>,
    top_level_used: &FxHashSet<Symbol>,
    report: &mut OptimizationReport,
) -> Program {
    stmts
        .into_iter()
        .filter_map(|stmt| match stmt {
            Statement::VarDecl { name, span, .. } if !full_used.contains(&name) => {
                report.record(unused_detail(name, span.line));
                None
            }
            Statement::ArrayDecl { name, span, .. } if !full_used.contains(&name) => {
                report.record(unused_detail(name, span.line));
                None
            }
            Statement::RoutineDecl { name, params, return_type, body, span } => {
                let local_used = collect_used(&body, true);
                let keep: FxHashSet<Symbol> = local_used.union(top_level_used).copied().collect();
                Some(Statement::RoutineDecl {
                    name,
                    params,
                    return_type,
                    body: strip_nested(body, &keep, report),
                    span,
                })
            }
            Statement::IfStmt { cond, then_branch, else_branch, span } => Some(Statement::IfStmt {
                cond,
                then_branch: strip_top_level(then_branch, full_used, top_level_used, report),
                else_branch: else_branch.map(|b| strip_top_level(b, full_used, top_level_used, report)),
                span,
            }),
            Statement::WhileStmt { cond, body, span } => Some(Statement::WhileStmt {
                cond,
                body: strip_top_level(body, full_used, top_level_used, report),
                span,
            }),
            Statement::ForLoop { var, reverse, start, end, body, span } => Some(Statement::ForLoop {
                var,
                reverse,
                start,
                end,
                body: strip_top_level(body, full_used, top_level_used, report),
                span,
            }),
            other => Some(other),
        })
        .collect()
}

/// Same shape as [`strip_top_level`], but `keep` (the routine's
/// local-used ∪ global-used set) is fixed for the whole recursion.
fn strip_nested(stmts: Program, keep: &FxHashSet<Symbol>, report: &mut OptimizationReport) -> Program {
    stmts
        .into_iter()
        .filter_map(|stmt| match stmt {
            Statement::VarDecl { name, span, .. } if !keep.contains(&name) => {
                report.record(unused_detail(name, span.line));
                None
            }
            Statement::ArrayDecl { name, span, .. } if !keep.contains(&name) => {
                report.record(unused_detail(name, span.line));
                None
            }
            Statement::IfStmt { cond, then_branch, else_branch, span } => Some(Statement::IfStmt {
                cond,
                then_branch: strip_nested(then_branch, keep, report),
                else_branch: else_branch.map(|b| strip_nested(b, keep, report)),
                span,
            }),
            Statement::WhileStmt { cond, body, span } => Some(Statement::WhileStmt {
                cond,
                body: strip_nested(body, keep, report),
                span,
            }),
            Statement::ForLoop { var, reverse, start, end, body, span } => Some(Statement::ForLoop {
                var,
                reverse,
                start,
                end,
                body: strip_nested(body, keep, report),
                span,
            }),
            Statement::RoutineDecl { name, params, return_type, body, span } => {
                let local_used = collect_used(&body, true);
                let nested_keep: FxHashSet<Symbol> = local_used.union(keep).copied().collect();
                Some(Statement::RoutineDecl {
                    name,
                    params,
                    return_type,
                    body: strip_nested(body, &nested_keep, report),
                    span,
                })
            }
            other => Some(other),
        })
        .collect()
}

fn unused_detail(name: Symbol, line: u32) -> OptimizationDetail {
    OptimizationDetail {
        kind: OptimizationKind::UnusedVariable,
        description: format!("'{name}' is never read or written"),
        before_text: format!("var {name} : ...;"),
        after_text: String::new(),
        line: Some(line),
    }
}

/// Collects every name used as a `VarRef`, in `RecordAccess.record`,
/// `ArrayAccess.name`, an assignment target, or a `ForLoop` variable.
/// When `descend_into_routines` is false, nested routine bodies are
/// skipped — used to compute the "global-used" (top-level-only) set.
fn collect_used(stmts: &[Statement], descend_into_routines: bool) -> FxHashSet<Symbol> {
    let mut used = FxHashSet::default();
    for stmt in stmts {
        collect_used_in_stmt(stmt, descend_into_routines, &mut used);
    }
    used
}

fn collect_used_in_stmt(stmt: &Statement, descend_into_routines: bool, used: &mut FxHashSet<Symbol>) {
    match stmt {
        Statement::VarDecl { init: Some(e), .. } => collect_used_in_expr(e, used),
        Statement::VarDecl { init: None, .. }
        | Statement::ArrayDecl { .. }
        | Statement::TypeDecl { .. }
        | Statement::ReadStmt { .. } => {}
        Statement::RoutineDecl { body, .. } => {
            if descend_into_routines {
                for s in body {
                    collect_used_in_stmt(s, descend_into_routines, used);
                }
            }
        }
        Statement::Assignment { target, value, .. } => {
            match target {
                LValue::Var(name) => {
                    used.insert(*name);
                }
                LValue::Index(name, index) => {
                    used.insert(*name);
                    collect_used_in_expr(index, used);
                }
                LValue::Field(record, _field) => {
                    used.insert(*record);
                }
            }
            collect_used_in_expr(value, used);
        }
        Statement::IfStmt { cond, then_branch, else_branch, .. } => {
            collect_used_in_expr(cond, used);
            for s in then_branch {
                collect_used_in_stmt(s, descend_into_routines, used);
            }
            if let Some(else_branch) = else_branch {
                for s in else_branch {
                    collect_used_in_stmt(s, descend_into_routines, used);
                }
            }
        }
        Statement::WhileStmt { cond, body, .. } => {
            collect_used_in_expr(cond, used);
            for s in body {
                collect_used_in_stmt(s, descend_into_routines, used);
            }
        }
        Statement::ForLoop { var, start, end, body, .. } => {
            used.insert(*var);
            collect_used_in_expr(start, used);
            collect_used_in_expr(end, used);
            for s in body {
                collect_used_in_stmt(s, descend_into_routines, used);
            }
        }
        Statement::PrintStmt { expr, .. } => collect_used_in_expr(expr, used),
        Statement::ReturnStmt { expr: Some(e), .. } => collect_used_in_expr(e, used),
        Statement::ReturnStmt { expr: None, .. } => {}
        Statement::RoutineCallStmt { args, .. } => {
            for a in args {
                collect_used_in_expr(a, used);
            }
        }
    }
}

fn collect_used_in_expr(expr: &Expression, used: &mut FxHashSet<Symbol>) {
    match expr {
        Expression::IntegerLit(..)
        | Expression::RealLit(..)
        | Expression::BooleanLit(..)
        | Expression::StringLit(..) => {}
        Expression::VarRef(name, _) => {
            used.insert(*name);
        }
        Expression::ArrayAccess { name, index, .. } => {
            used.insert(*name);
            collect_used_in_expr(index, used);
        }
        Expression::RecordAccess { record, .. } => collect_used_in_expr(record, used),
        Expression::Unary { operand, .. } => collect_used_in_expr(operand, used),
        Expression::Binary { left, right, .. } => {
            collect_used_in_expr(left, used);
            collect_used_in_expr(right, used);
        }
        Expression::RoutineCall { args, .. } => {
            for a in args {
                collect_used_in_expr(a, used);
            }
        }
        Expression::TypeCast { expr, .. } => collect_used_in_expr(expr, used),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_par::ast::{Param, TypeExpr};
    use ilc_util::Span;

    fn int_ty() -> TypeExpr {
        TypeExpr::Simple(Symbol::intern("integer"))
    }

    fn var_decl(name: &str, init: Option<Expression>) -> Statement {
        Statement::VarDecl { name: Symbol::intern(name), ty: int_ty(), init, span: Span::DUMMY }
    }

    #[test]
    fn drops_top_level_var_never_referenced() {
        let mut report = OptimizationReport::default();
        let program = vec![var_decl("dead", Some(Expression::IntegerLit(1, Span::DUMMY)))];
        let result = strip_unused_vars(program, &mut report);
        assert!(result.is_empty());
        assert_eq!(report.count, 1);
    }

    #[test]
    fn keeps_var_referenced_by_print() {
        let mut report = OptimizationReport::default();
        let program = vec![
            var_decl("x", Some(Expression::IntegerLit(1, Span::DUMMY))),
            Statement::PrintStmt {
                expr: Expression::VarRef(Symbol::intern("x"), Span::DUMMY),
                span: Span::DUMMY,
            },
        ];
        let result = strip_unused_vars(program, &mut report);
        assert_eq!(result.len(), 2);
        assert_eq!(report.count, 0);
    }

    #[test]
    fn drops_unused_local_inside_routine() {
        let mut report = OptimizationReport::default();
        let program = vec![Statement::RoutineDecl {
            name: Symbol::intern("f"),
            params: Vec::<Param>::new(),
            return_type: None,
            body: vec![var_decl("dead", None)],
            span: Span::DUMMY,
        }];
        let result = strip_unused_vars(program, &mut report);
        match &result[0] {
            Statement::RoutineDecl { body, .. } => assert!(body.is_empty()),
            _ => panic!("expected routine decl"),
        }
        assert_eq!(report.count, 1);
    }

    #[test]
    fn assignment_to_a_name_counts_as_a_use() {
        let mut report = OptimizationReport::default();
        let program = vec![
            var_decl("x", None),
            Statement::Assignment {
                target: LValue::Var(Symbol::intern("x")),
                value: Expression::IntegerLit(5, Span::DUMMY),
                span: Span::DUMMY,
            },
        ];
        let result = strip_unused_vars(program, &mut report);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn for_loop_variable_counts_as_used() {
        let used = collect_used(
            &[Statement::ForLoop {
                var: Symbol::intern("i"),
                reverse: false,
                start: Expression::IntegerLit(1, Span::DUMMY),
                end: Expression::IntegerLit(10, Span::DUMMY),
                body: vec![],
                span: Span::DUMMY,
            }],
            true,
        );
        assert!(used.contains(&Symbol::intern("i")));
    }
}
