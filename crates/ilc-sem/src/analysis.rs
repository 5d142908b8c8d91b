//! The five-pass semantic analyzer (spec.md §4.3).
//!
//! Rationale for the pass split: routines and types may be referenced
//! before their top-level declaration appears in source order, so
//! names are hoisted before any body is walked.

use crate::scope::SymbolTable;
use crate::types::{RoutineSig, Type};
use ilc_par::ast::{BinOp, Expression, LValue, Param, Program, Statement, TypeExpr, UnOp};
use ilc_util::diagnostic::{DiagnosticBuilder, Kind};
use ilc_util::{Handler, Span, Symbol};

pub struct Analyzer<'a> {
    table: SymbolTable,
    handler: &'a Handler,
    return_type_stack: Vec<Option<Type>>,
}

/// Runs all five passes over `program`. Returns the populated symbol
/// table — which `ilc-gen` needs for local-slot and descriptor
/// information — iff no errors were reported; a non-empty diagnostic
/// list aborts the pipeline before optimization (spec.md §7.3).
pub fn analyze(program: &Program, handler: &Handler) -> Option<SymbolTable> {
    let mut analyzer = Analyzer {
        table: SymbolTable::new(),
        handler,
        return_type_stack: Vec::new(),
    };
    analyzer.pass1_hoist_types(program);
    analyzer.pass2_hoist_routines(program);
    analyzer.pass3_hoist_vars(program);
    analyzer.pass4_routine_bodies(program);
    analyzer.pass5_remaining(program);

    if handler.has_errors() {
        None
    } else {
        Some(analyzer.table)
    }
}

impl<'a> Analyzer<'a> {
    fn error(&self, span: Span, message: impl Into<String>) {
        DiagnosticBuilder::error(Kind::Semantic, message).span(span).emit(self.handler);
    }

    // -- Pass 1: type hoisting ----------------------------------------------
    //
    // Runs before routine hoisting so a routine signature that names a
    // record type (`routine f(p : Point) : Point is ...`) resolves
    // against an already-declared type instead of silently falling back
    // to `void`.

    fn pass1_hoist_types(&mut self, program: &Program) {
        for stmt in program {
            if let Statement::TypeDecl { name, ty, span } = stmt {
                if SymbolTable::is_builtin_type(*name) {
                    self.error(*span, format!("Type '{name}' collides with a built-in type name"));
                    continue;
                }
                match self.resolve_named_type_decl(*name, ty) {
                    Some(resolved) => {
                        if !self.table.declare_type(*name, resolved) {
                            self.error(*span, format!("Type '{name}' already defined."));
                        }
                    }
                    None => self.error(*span, format!("Type '{name}' has an invalid field type")),
                }
            }
        }
    }

    // -- Pass 2: routine hoisting ---------------------------------------

    fn pass2_hoist_routines(&mut self, program: &Program) {
        for stmt in program {
            if let Statement::RoutineDecl { name, params, return_type, span, .. } = stmt {
                let param_types = params
                    .iter()
                    .map(|p| self.resolve_type_expr(&p.ty).unwrap_or_else(Type::void))
                    .collect();
                let return_type = return_type.as_ref().map(|t| self.resolve_type_expr(t).unwrap_or_else(Type::void));
                let sig = RoutineSig { params: param_types, return_type };
                if !self.table.declare_routine(*name, sig) {
                    self.error(*span, format!("Routine {name} already defined."));
                }
            }
        }
    }

    /// Resolves the right-hand side of a `type NAME is <type_body>`
    /// declaration, tagging a record body with the declared name so
    /// [`Type::is_compatible_with`] can tell two structurally identical
    /// records with different names apart (spec.md §259's nominal typing).
    /// The grammar only ever produces [`TypeExpr::Record`] here — record
    /// bodies cannot appear nested inside a field, parameter, or array
    /// element type — so this is the only place a name needs threading.
    fn resolve_named_type_decl(&self, name: Symbol, ty: &TypeExpr) -> Option<Type> {
        match ty {
            TypeExpr::Record(fields) => {
                let mut resolved = Vec::with_capacity(fields.len());
                for field in fields {
                    resolved.push((field.name, self.resolve_type_expr(&field.ty)?));
                }
                Some(Type::Record { name, fields: resolved })
            }
            other => self.resolve_type_expr(other),
        }
    }

    /// Resolves a [`TypeExpr`] (as written in source) into a [`Type`]
    /// (structural, with user-type names expanded). Returns `None` if a
    /// named type does not exist.
    fn resolve_type_expr(&self, ty: &TypeExpr) -> Option<Type> {
        match ty {
            TypeExpr::Simple(name) => self.table.lookup_type(*name).cloned(),
            TypeExpr::Array { element, size } => {
                let element = self.resolve_type_expr(element)?;
                Some(Type::Array { element: Box::new(element), size: *size })
            }
            TypeExpr::Record(_) => {
                unreachable!("record bodies only appear directly under a `type NAME is` declaration; resolve_named_type_decl handles those")
            }
        }
    }

    // -- Pass 3: top-level variable/array hoisting ------------------------

    fn pass3_hoist_vars(&mut self, program: &Program) {
        for stmt in program {
            match stmt {
                Statement::VarDecl { name, ty, init, span } => {
                    self.hoist_var_decl(*name, ty, init.as_ref(), *span);
                }
                Statement::ArrayDecl { name, ty, span } => {
                    self.hoist_array_decl(*name, ty, *span);
                }
                _ => {}
            }
        }
    }

    fn hoist_var_decl(&mut self, name: Symbol, ty: &TypeExpr, init: Option<&Expression>, span: Span) {
        let Some(declared) = self.resolve_type_expr(ty) else {
            self.error(span, format!("Undefined type in declaration of '{name}'"));
            return;
        };
        if let Some(init_expr) = init {
            let init_ty = self.type_of_expr(init_expr);
            if !init_ty.is_compatible_with(&declared) {
                self.error(
                    init_expr.span(),
                    format!("Type mismatch: cannot initialize '{name}' of type {declared} with {init_ty}"),
                );
            }
        }
        if !self.table.declare_var(name, declared) {
            self.error(span, format!("Variable '{name}' already declared"));
        }
    }

    fn hoist_array_decl(&mut self, name: Symbol, ty: &TypeExpr, span: Span) {
        let TypeExpr::Array { size, .. } = ty else {
            unreachable!("ArrayDecl always carries an Array TypeExpr");
        };
        if *size <= 0 {
            self.error(span, format!("Array '{name}' must have a size greater than 0"));
        }
        let Some(declared) = self.resolve_type_expr(ty) else {
            self.error(span, format!("Undefined element type in array '{name}'"));
            return;
        };
        if !self.table.declare_var(name, declared) {
            self.error(span, format!("Variable '{name}' already declared"));
        }
    }

    // -- Pass 4: routine bodies --------------------------------------------

    fn pass4_routine_bodies(&mut self, program: &Program) {
        for stmt in program {
            if let Statement::RoutineDecl { params, return_type, body, span, .. } = stmt {
                self.check_routine_body(params, return_type, body, *span);
            }
        }
    }

    fn check_routine_body(
        &mut self,
        params: &[Param],
        return_type: &Option<TypeExpr>,
        body: &[Statement],
        span: Span,
    ) {
        self.table.push_scope();
        for param in params {
            let ty = self.resolve_type_expr(&param.ty).unwrap_or_else(Type::void);
            self.table.declare_var(param.name, ty);
        }
        let expected_return = return_type.as_ref().map(|t| self.resolve_type_expr(t).unwrap_or_else(Type::void));
        let is_void = expected_return.is_none();
        self.return_type_stack.push(expected_return);

        for s in body {
            self.check_stmt(s);
        }

        if !is_void && !has_return(body) {
            self.error(span, "Routine with a non-void return type must return a value on every path");
        }

        self.return_type_stack.pop();
        self.table.pop_scope();
    }

    // -- Pass 5: remaining top-level statements ----------------------------

    fn pass5_remaining(&mut self, program: &Program) {
        for stmt in program {
            match stmt {
                Statement::VarDecl { .. }
                | Statement::ArrayDecl { .. }
                | Statement::TypeDecl { .. }
                | Statement::RoutineDecl { .. } => {}
                other => self.check_stmt(other),
            }
        }
    }

    // -- Statement checking -------------------------------------------------

    fn check_stmt(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDecl { name, ty, init, span } => self.hoist_var_decl(*name, ty, init.as_ref(), *span),
            Statement::ArrayDecl { name, ty, span } => self.hoist_array_decl(*name, ty, *span),
            Statement::TypeDecl { .. } | Statement::RoutineDecl { .. } => {
                // Only legal at top level; pass 5 never visits these,
                // and nested declarations aren't part of the grammar.
            }
            Statement::Assignment { target, value, span } => self.check_assignment(target, value, *span),
            Statement::IfStmt { cond, then_branch, else_branch, .. } => {
                self.check_condition(cond);
                self.table.push_scope();
                for s in then_branch {
                    self.check_stmt(s);
                }
                self.table.pop_scope();
                if let Some(else_branch) = else_branch {
                    self.table.push_scope();
                    for s in else_branch {
                        self.check_stmt(s);
                    }
                    self.table.pop_scope();
                }
            }
            Statement::WhileStmt { cond, body, .. } => {
                self.check_condition(cond);
                self.table.push_scope();
                for s in body {
                    self.check_stmt(s);
                }
                self.table.pop_scope();
            }
            Statement::ForLoop { var, start, end, body, .. } => {
                let start_ty = self.type_of_expr(start);
                let end_ty = self.type_of_expr(end);
                if !start_ty.is_integer() {
                    self.error(start.span(), format!("Type mismatch: for-loop range start must be integer, found {start_ty}"));
                }
                if !end_ty.is_integer() {
                    self.error(end.span(), format!("Type mismatch: for-loop range end must be integer, found {end_ty}"));
                }
                // Open Question resolution: the loop variable is
                // auto-declared as `integer` in a fresh inner scope
                // rather than requiring a pre-existing declaration.
                self.table.push_scope();
                self.table.declare_var(*var, Type::integer());
                for s in body {
                    self.check_stmt(s);
                }
                self.table.pop_scope();
            }
            Statement::PrintStmt { expr, .. } => {
                self.type_of_expr(expr);
            }
            Statement::ReadStmt { var, span } => {
                if self.table.lookup_var(*var).is_none() {
                    self.error(*span, format!("Undefined variable '{var}'"));
                }
            }
            Statement::ReturnStmt { expr, span } => self.check_return(expr.as_ref(), *span),
            Statement::RoutineCallStmt { name, args, span } => {
                self.check_call(*name, args, *span);
            }
        }
    }

    fn check_condition(&mut self, cond: &Expression) {
        let ty = self.type_of_expr(cond);
        if !ty.is_boolean() {
            self.error(cond.span(), format!("Type mismatch: condition must be boolean, found {ty}"));
        }
    }

    fn check_assignment(&mut self, target: &LValue, value: &Expression, span: Span) {
        let value_ty = self.type_of_expr(value);
        let target_ty = match target {
            LValue::Var(name) => match self.table.lookup_var(*name) {
                Some(ty) => ty.clone(),
                None => {
                    self.error(span, format!("Undefined variable '{name}'"));
                    return;
                }
            },
            LValue::Index(name, index) => {
                let index_ty = self.type_of_expr(index);
                if !index_ty.is_integer() {
                    self.error(index.span(), format!("Type mismatch: array index must be integer, found {index_ty}"));
                }
                let Some(var_ty) = self.table.lookup_var(*name).cloned() else {
                    self.error(span, format!("Undefined variable '{name}'"));
                    return;
                };
                let Type::Array { element, size } = &var_ty else {
                    self.error(span, format!("'{name}' is not an array"));
                    return;
                };
                // Open Question resolution: `0 <= index < size`, strict
                // upper-bound exclusion (the source's `index > size`
                // check is treated as an off-by-one bug, not matched).
                if let Expression::IntegerLit(i, ispan) = index.as_ref() {
                    if *i < 0 || *i >= *size {
                        self.error(*ispan, format!("Array index {i} out of bounds for '{name}' of size {size}"));
                    }
                }
                (**element).clone()
            }
            LValue::Field(record, field) => {
                let Some(record_ty) = self.table.lookup_var(*record).cloned() else {
                    self.error(span, format!("Undefined variable '{record}'"));
                    return;
                };
                match record_ty.field(*field) {
                    Some(field_ty) => field_ty.clone(),
                    None => {
                        self.error(span, format!("Field '{field}' does not exist on '{record}'"));
                        return;
                    }
                }
            }
        };
        if !value_ty.is_compatible_with(&target_ty) {
            self.error(span, format!("Type mismatch: cannot assign {value_ty} to {target_ty}"));
        }
    }

    fn check_return(&mut self, expr: Option<&Expression>, span: Span) {
        let expected = self.return_type_stack.last().cloned().flatten();
        match (expected, expr) {
            (None, None) => {}
            (None, Some(e)) => {
                self.error(e.span(), "Type mismatch: routine is void but return has a value");
            }
            (Some(_), None) => {
                self.error(span, "Type mismatch: routine expects a return value");
            }
            (Some(expected), Some(e)) => {
                let actual = self.type_of_expr(e);
                if !actual.is_compatible_with(&expected) {
                    self.error(e.span(), format!("Type mismatch: expected return type {expected}, found {actual}"));
                }
            }
        }
    }

    fn check_call(&mut self, name: Symbol, args: &[Expression], span: Span) -> Type {
        let Some(sig) = self.table.lookup_routine(name).cloned() else {
            self.error(span, format!("Undefined routine '{name}'"));
            return Type::void();
        };
        if args.len() != sig.params.len() {
            self.error(
                span,
                format!(
                    "Wrong number of arguments to '{name}': expected {}, found {}",
                    sig.params.len(),
                    args.len()
                ),
            );
        }
        for (arg, expected) in args.iter().zip(sig.params.iter()) {
            let actual = self.type_of_expr(arg);
            if !actual.is_compatible_with(expected) {
                self.error(arg.span(), format!("Type mismatch: argument to '{name}' expected {expected}, found {actual}"));
            }
        }
        sig.return_type.unwrap_or_else(Type::void)
    }

    // -- Expression typing ---------------------------------------------------

    fn type_of_expr(&mut self, expr: &Expression) -> Type {
        match expr {
            Expression::IntegerLit(..) => Type::integer(),
            Expression::RealLit(..) => Type::real(),
            Expression::BooleanLit(..) => Type::boolean(),
            Expression::StringLit(..) => Type::string(),
            Expression::VarRef(name, span) => match self.table.lookup_var(*name) {
                Some(ty) => ty.clone(),
                None => {
                    self.error(*span, format!("Undefined variable '{name}'"));
                    Type::void()
                }
            },
            Expression::ArrayAccess { name, index, span } => {
                let index_ty = self.type_of_expr(index);
                if !index_ty.is_integer() {
                    self.error(index.span(), format!("Type mismatch: array index must be integer, found {index_ty}"));
                }
                match self.table.lookup_var(*name) {
                    Some(Type::Array { element, size }) => {
                        if let Expression::IntegerLit(i, ispan) = index.as_ref() {
                            if *i < 0 || *i >= *size {
                                self.error(*ispan, format!("Array index {i} out of bounds for '{name}' of size {size}"));
                            }
                        }
                        (**element).clone()
                    }
                    Some(_) => {
                        self.error(*span, format!("'{name}' is not an array"));
                        Type::void()
                    }
                    None => {
                        self.error(*span, format!("Undefined variable '{name}'"));
                        Type::void()
                    }
                }
            }
            Expression::RecordAccess { record, field, span } => {
                let record_ty = self.type_of_expr(record);
                match record_ty.field(*field) {
                    Some(ty) => ty.clone(),
                    None => {
                        self.error(*span, format!("Field '{field}' does not exist"));
                        Type::void()
                    }
                }
            }
            Expression::Unary { op, operand, span } => {
                let ty = self.type_of_expr(operand);
                match op {
                    UnOp::Neg if ty.is_numeric() => ty,
                    UnOp::Neg => {
                        self.error(*span, format!("Type mismatch: unary '-' requires a numeric operand, found {ty}"));
                        Type::void()
                    }
                    UnOp::Not if ty.is_boolean() => ty,
                    UnOp::Not => {
                        self.error(*span, format!("Type mismatch: 'not' requires a boolean operand, found {ty}"));
                        Type::void()
                    }
                }
            }
            Expression::Binary { left, op, right, span } => self.type_of_binary(left, *op, right, *span),
            Expression::RoutineCall { name, args, span } => self.check_call(*name, args, *span),
            Expression::TypeCast { expr, target_type, span } => {
                let source_ty = self.type_of_expr(expr);
                let Some(target) = self.resolve_type_expr(target_type) else {
                    self.error(*span, "Undefined target type in cast");
                    return Type::void();
                };
                let castable = |t: &Type| t.is_integer() || t.is_real() || t.is_boolean();
                if !castable(&source_ty) || !castable(&target) {
                    self.error(*span, format!("Type mismatch: cannot cast {source_ty} to {target}"));
                }
                target
            }
        }
    }

    fn type_of_binary(&mut self, left: &Expression, op: BinOp, right: &Expression, span: Span) -> Type {
        let lty = self.type_of_expr(left);
        let rty = self.type_of_expr(right);
        match op {
            BinOp::Add if lty.is_string() || rty.is_string() => Type::string(),
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                if lty.is_integer() && rty.is_integer() {
                    Type::integer()
                } else if lty.is_numeric() && rty.is_numeric() {
                    Type::real()
                } else {
                    self.error(span, format!("Type mismatch: numeric operator on {lty} and {rty}"));
                    Type::void()
                }
            }
            BinOp::Eq | BinOp::NotEq | BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
                if !(lty.is_numeric() && rty.is_numeric()) && lty != rty {
                    self.error(span, format!("Type mismatch: comparison between {lty} and {rty}"));
                }
                Type::boolean()
            }
            BinOp::And | BinOp::Or | BinOp::Xor => {
                if !lty.is_boolean() || !rty.is_boolean() {
                    self.error(span, format!("Type mismatch: logical operator requires boolean operands, found {lty} and {rty}"));
                }
                Type::boolean()
            }
        }
    }
}

/// `true` iff `body` contains a top-level `ReturnStatement`, or ends in
/// a terminal `if` whose both branches satisfy `has_return`
/// (spec.md §3's return-path coverage rule).
pub fn has_return(body: &[Statement]) -> bool {
    body.iter().any(|s| match s {
        Statement::ReturnStmt { .. } => true,
        Statement::IfStmt { then_branch, else_branch: Some(else_branch), .. } => {
            has_return(then_branch) && has_return(else_branch)
        }
        _ => false,
    })
}
