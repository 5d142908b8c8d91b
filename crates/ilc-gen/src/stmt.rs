//! Statement lowering: control flow, assignment, declarations, and the
//! `print`/`read` intrinsics, per spec.md §4.5.

use ilc_par::ast::{LValue, Statement};
use ilc_sem::Type;

use crate::descriptor::resolve_type_expr;
use crate::emitter::{array_store_op, is_reference_type, Emitter};
use crate::error::{CodegenError, Result};
use crate::expr::{emit_call, emit_expr, push_int};

pub(crate) fn emit_block(em: &mut Emitter, stmts: &[Statement]) -> Result<()> {
    for stmt in stmts {
        emit_stmt(em, stmt)?;
    }
    Ok(())
}

pub(crate) fn emit_stmt(em: &mut Emitter, stmt: &Statement) -> Result<()> {
    match stmt {
        Statement::VarDecl { name, ty, init, .. } => emit_var_decl(em, *name, ty, init.as_ref()),
        Statement::ArrayDecl { name, ty, .. } => emit_array_decl(em, *name, ty),
        // A record type declared inside a body has no runtime
        // representation of its own; `TypeDecl` only matters at the top
        // level, where `unit.rs` turns it into its own translation unit.
        Statement::TypeDecl { .. } => Ok(()),
        // Nested routine declarations parse but are inert in semantic
        // analysis (see `ilc_sem::analysis`'s pass 5) — codegen mirrors
        // that and emits nothing for one found in a body.
        Statement::RoutineDecl { .. } => Ok(()),
        Statement::Assignment { target, value, .. } => emit_assignment(em, target, value),
        Statement::IfStmt { cond, then_branch, else_branch, .. } => {
            emit_if(em, cond, then_branch, else_branch.as_deref())
        }
        Statement::WhileStmt { cond, body, .. } => emit_while(em, cond, body),
        Statement::ForLoop { var, reverse, start, end, body, .. } => {
            emit_for(em, *var, *reverse, start, end, body)
        }
        Statement::PrintStmt { expr, .. } => emit_print(em, expr),
        Statement::ReadStmt { var, .. } => emit_read(em, *var),
        Statement::ReturnStmt { expr, .. } => emit_return(em, expr.as_ref()),
        Statement::RoutineCallStmt { name, args, .. } => {
            let ret = emit_call(em, *name, args)?;
            if !ret.is_void() {
                em.emit(if ret.is_real() { "pop2" } else { "pop" });
            }
            Ok(())
        }
    }
}

fn emit_var_decl(
    em: &mut Emitter,
    name: ilc_util::Symbol,
    ty: &ilc_par::ast::TypeExpr,
    init: Option<&ilc_par::ast::Expression>,
) -> Result<()> {
    let resolved = resolve_type_expr(ty, em.table)?;
    let slot = em.state.declare_local(name, resolved.clone());
    match init {
        Some(init_expr) => {
            let init_ty = emit_expr(em, init_expr)?;
            if resolved.is_real() && init_ty.is_integer() {
                em.emit("i2d");
            }
            em.store_var(name, &resolved);
        }
        None => emit_default_init(em, &resolved, slot),
    }
    Ok(())
}

fn emit_array_decl(em: &mut Emitter, name: ilc_util::Symbol, ty: &ilc_par::ast::TypeExpr) -> Result<()> {
    let resolved = resolve_type_expr(ty, em.table)?;
    let slot = em.state.declare_local(name, resolved.clone());
    let Type::Array { element, size } = &resolved else {
        unreachable!("ArrayDecl always carries an Array TypeExpr");
    };
    emit_array_new(em, element, *size);
    em.emit(format!("astore {slot}"));
    Ok(())
}

/// Zero-initializes a declared-but-uninitialized local: `0`/`0.0`/`1`
/// for scalars per the field-default rules spec.md §4.5 states for
/// static fields (locals follow the same defaults), a default-
/// constructed instance for a record, and a fresh array for an array
/// type (the grammar never lets `var` declare an array without a size,
/// but `ArrayDecl` shares this path through `emit_array_decl`'s own
/// call instead).
fn emit_default_init(em: &mut Emitter, ty: &Type, slot: u16) {
    match ty {
        t if t.is_real() => {
            em.emit("dconst_0");
            em.emit(format!("dstore {slot}"));
        }
        t if t.is_integer() || t.is_boolean() => {
            em.emit("iconst_0");
            em.emit(format!("istore {slot}"));
        }
        t if t.is_string() => {
            em.emit("aconst_null");
            em.emit(format!("astore {slot}"));
        }
        Type::Simple(record_name) => {
            em.emit(format!("new {record_name}"));
            em.emit("dup");
            em.emit(format!("invokespecial {record_name}/<init>()V"));
            em.emit(format!("astore {slot}"));
        }
        Type::Array { element, size } => {
            emit_array_new(em, element, *size);
            em.emit(format!("astore {slot}"));
        }
        Type::Record { .. } => unreachable!("anonymous record types never reach codegen"),
    }
}

fn emit_array_new(em: &mut Emitter, element: &Type, size: i32) {
    push_int(em, size);
    if is_reference_type(element) {
        em.emit(format!("anewarray {}", reference_class_name(element)));
    } else {
        let tag = if element.is_real() {
            "double"
        } else if element.is_boolean() {
            "boolean"
        } else {
            "int"
        };
        em.emit(format!("newarray {tag}"));
    }
}

fn reference_class_name(ty: &Type) -> String {
    match ty {
        Type::Simple(name) if name.as_str() == "string" => "java/lang/String".to_string(),
        Type::Simple(name) => name.to_string(),
        Type::Array { .. } => crate::descriptor::descriptor_of(ty),
        Type::Record { .. } => unreachable!("anonymous record types never reach codegen"),
    }
}

fn emit_assignment(em: &mut Emitter, target: &LValue, value: &ilc_par::ast::Expression) -> Result<()> {
    match target {
        LValue::Var(name) => {
            let target_ty = em.type_of_name(*name)?;
            let value_ty = emit_expr(em, value)?;
            if target_ty.is_real() && value_ty.is_integer() {
                em.emit("i2d");
            }
            em.store_var(*name, &target_ty);
            Ok(())
        }
        LValue::Index(name, index) => {
            let arr_ty = em.type_of_name(*name)?;
            let Type::Array { element, .. } = &arr_ty else {
                return Err(CodegenError::UnsupportedType(format!("'{name}' is not an array")));
            };
            em.load_var(*name, &arr_ty);
            emit_expr(em, index)?;
            let value_ty = emit_expr(em, value)?;
            if element.is_real() && value_ty.is_integer() {
                em.emit("i2d");
            }
            em.emit(array_store_op(element));
            Ok(())
        }
        LValue::Field(record, field) => {
            let record_ty = em.type_of_name(*record)?;
            em.load_var(*record, &record_ty);
            let Type::Simple(record_name) = &record_ty else {
                return Err(CodegenError::UnsupportedType(format!("'{record}' is not a record")));
            };
            let field_ty = em.record_field_type(*record_name, *field)?;
            let value_ty = emit_expr(em, value)?;
            if field_ty.is_real() && value_ty.is_integer() {
                em.emit("i2d");
            }
            em.emit(format!("putfield {record_name}/{field} {}", crate::descriptor::descriptor_of(&field_ty)));
            Ok(())
        }
    }
}

fn emit_if(
    em: &mut Emitter,
    cond: &ilc_par::ast::Expression,
    then_branch: &[Statement],
    else_branch: Option<&[Statement]>,
) -> Result<()> {
    emit_expr(em, cond)?;
    match else_branch {
        None => {
            let end = em.state.fresh_label("if_end");
            em.emit(format!("ifeq {end}"));
            emit_block(em, then_branch)?;
            em.emit_label(&end);
        }
        Some(else_branch) => {
            let else_label = em.state.fresh_label("if_else");
            let end = em.state.fresh_label("if_end");
            em.emit(format!("ifeq {else_label}"));
            emit_block(em, then_branch)?;
            if !ilc_sem::has_return(then_branch) {
                em.emit(format!("goto {end}"));
            }
            em.emit_label(&else_label);
            emit_block(em, else_branch)?;
            em.emit_label(&end);
        }
    }
    Ok(())
}

fn emit_while(em: &mut Emitter, cond: &ilc_par::ast::Expression, body: &[Statement]) -> Result<()> {
    let start = em.state.fresh_label("while_start");
    let end = em.state.fresh_label("while_end");
    em.emit_label(&start);
    emit_expr(em, cond)?;
    em.emit(format!("ifeq {end}"));
    emit_block(em, body)?;
    em.emit(format!("goto {start}"));
    em.emit_label(&end);
    Ok(())
}

fn emit_for(
    em: &mut Emitter,
    var: ilc_util::Symbol,
    reverse: bool,
    start: &ilc_par::ast::Expression,
    end: &ilc_par::ast::Expression,
    body: &[Statement],
) -> Result<()> {
    let slot = em.state.declare_local(var, Type::integer());
    emit_expr(em, start)?;
    em.emit(format!("istore {slot}"));

    let start_label = em.state.fresh_label("for_start");
    let end_label = em.state.fresh_label("for_end");
    em.emit_label(&start_label);
    em.emit(format!("iload {slot}"));
    emit_expr(em, end)?;
    em.emit(format!("{} {end_label}", if reverse { "if_icmplt" } else { "if_icmpgt" }));
    emit_block(em, body)?;
    em.emit(format!("iinc {slot} {}", if reverse { -1 } else { 1 }));
    em.emit(format!("goto {start_label}"));
    em.emit_label(&end_label);
    Ok(())
}

fn emit_print(em: &mut Emitter, expr: &ilc_par::ast::Expression) -> Result<()> {
    em.emit("getstatic java/lang/System/out Ljava/io/PrintStream;");
    let ty = emit_expr(em, expr)?;
    let desc = if ty.is_integer() {
        "(I)V"
    } else if ty.is_real() {
        "(D)V"
    } else if ty.is_boolean() {
        "(Z)V"
    } else if ty.is_string() {
        "(Ljava/lang/String;)V"
    } else {
        "(Ljava/lang/Object;)V"
    };
    em.emit(format!("invokevirtual java/io/PrintStream/println{desc}"));
    Ok(())
}

/// Reads one whitespace-delimited token from standard input, coerced to
/// `var`'s declared type. The actual scanning is an external-runtime
/// concern (spec.md §4.5 specifies only that the read is typed, not a
/// parsing strategy); codegen just calls the matching typed reader.
fn emit_read(em: &mut Emitter, var: ilc_util::Symbol) -> Result<()> {
    let ty = em.type_of_name(var)?;
    let method = if ty.is_integer() {
        "readInt()I"
    } else if ty.is_real() {
        "readReal()D"
    } else if ty.is_boolean() {
        "readBoolean()Z"
    } else {
        "readString()Ljava/lang/String;"
    };
    em.emit(format!("invokestatic Runtime/{method}"));
    em.store_var(var, &ty);
    Ok(())
}

fn emit_return(em: &mut Emitter, expr: Option<&ilc_par::ast::Expression>) -> Result<()> {
    match expr {
        None => em.emit("return"),
        Some(expr) => {
            let ty = emit_expr(em, expr)?;
            let op = if ty.is_real() {
                "dreturn"
            } else if is_reference_type(&ty) {
                "areturn"
            } else {
                "ireturn"
            };
            em.emit(op);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{RecordDefs, RoutineSigs};
    use ilc_par::ast::{Expression, TypeExpr};
    use ilc_sem::SymbolTable;
    use ilc_util::{FxHashMap, Span, Symbol};

    fn fresh<'a>(
        table: &'a SymbolTable,
        records: &'a RecordDefs,
        routines: &'a RoutineSigs,
        globals: &'a FxHashMap<Symbol, Type>,
    ) -> Emitter<'a> {
        Emitter::new(table, records, routines, globals)
    }

    #[test]
    fn var_decl_without_init_zero_initializes() {
        let table = SymbolTable::new();
        let (records, routines, globals) = (RecordDefs::default(), RoutineSigs::default(), FxHashMap::default());
        let mut em = fresh(&table, &records, &routines, &globals);
        emit_var_decl(&mut em, Symbol::intern("x"), &TypeExpr::Simple(Symbol::intern("integer")), None).unwrap();
        let body = em.take_body();
        assert!(body.contains("iconst_0"));
        assert!(body.contains("istore 0"));
    }

    #[test]
    fn for_loop_emits_bound_compare_and_increment() {
        let table = SymbolTable::new();
        let (records, routines, globals) = (RecordDefs::default(), RoutineSigs::default(), FxHashMap::default());
        let mut em = fresh(&table, &records, &routines, &globals);
        emit_for(
            &mut em,
            Symbol::intern("i"),
            false,
            &Expression::IntegerLit(1, Span::DUMMY),
            &Expression::IntegerLit(10, Span::DUMMY),
            &[],
        )
        .unwrap();
        let body = em.take_body();
        assert!(body.contains("if_icmpgt"));
        assert!(body.contains("iinc 0 1"));
    }

    #[test]
    fn reverse_for_loop_decrements_and_checks_less_than() {
        let table = SymbolTable::new();
        let (records, routines, globals) = (RecordDefs::default(), RoutineSigs::default(), FxHashMap::default());
        let mut em = fresh(&table, &records, &routines, &globals);
        emit_for(
            &mut em,
            Symbol::intern("i"),
            true,
            &Expression::IntegerLit(10, Span::DUMMY),
            &Expression::IntegerLit(1, Span::DUMMY),
            &[],
        )
        .unwrap();
        let body = em.take_body();
        assert!(body.contains("if_icmplt"));
        assert!(body.contains("iinc 0 -1"));
    }

    #[test]
    fn while_loop_shape_matches_start_cond_body_goto() {
        let table = SymbolTable::new();
        let (records, routines, globals) = (RecordDefs::default(), RoutineSigs::default(), FxHashMap::default());
        let mut em = fresh(&table, &records, &routines, &globals);
        emit_while(&mut em, &Expression::BooleanLit(true, Span::DUMMY), &[]).unwrap();
        let body = em.take_body();
        assert!(body.contains("ifeq"));
        assert!(body.contains("goto while_start_0"));
    }

    #[test]
    fn if_without_else_branches_past_a_single_label() {
        let table = SymbolTable::new();
        let (records, routines, globals) = (RecordDefs::default(), RoutineSigs::default(), FxHashMap::default());
        let mut em = fresh(&table, &records, &routines, &globals);
        emit_if(&mut em, &Expression::BooleanLit(true, Span::DUMMY), &[], None).unwrap();
        let body = em.take_body();
        assert!(body.contains("ifeq if_end_0"));
    }

    #[test]
    fn void_return_emits_bare_return() {
        let table = SymbolTable::new();
        let (records, routines, globals) = (RecordDefs::default(), RoutineSigs::default(), FxHashMap::default());
        let mut em = fresh(&table, &records, &routines, &globals);
        emit_return(&mut em, None).unwrap();
        assert!(em.take_body().trim().ends_with("return"));
    }
}
