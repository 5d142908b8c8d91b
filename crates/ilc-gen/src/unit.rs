//! Top-level orchestration: turns a validated [`Program`] into the set
//! of translation units spec.md §4.5/§6 describes — one `.j`-style unit
//! per record type plus a `Main` unit holding static fields, a default-
//! initializer section, one method per routine, and the `main` entry
//! point.

use ilc_par::ast::{Program, Statement};
use ilc_sem::{SymbolTable, Type};
use ilc_util::Symbol;

use crate::descriptor::{collect_globals, collect_record_defs, collect_routine_sigs, descriptor_of, method_descriptor};
use crate::emitter::Emitter;
use crate::error::{CodegenError, Result};
use crate::stmt::emit_block;

/// A record unit's or the main unit's name paired with its assembled
/// text, ready to be written to `<name>.j` by the driver before handing
/// the files to the external assembler (records first, then `Main`, per
/// spec.md §6's invocation order).
pub struct CompiledUnit {
    pub name: String,
    pub text: String,
}

pub struct CompiledUnits {
    pub records: Vec<CompiledUnit>,
    pub main: CompiledUnit,
}

pub fn generate(program: &Program, table: &SymbolTable) -> Result<CompiledUnits> {
    let records = collect_record_defs(program, table)?;
    let routines = collect_routine_sigs(program, table)?;
    let globals = collect_globals(program, table)?;

    let mut record_units = Vec::new();
    for stmt in program {
        if let Statement::TypeDecl { name, .. } = stmt {
            if let Some(fields) = records.get(name) {
                record_units.push(CompiledUnit { name: name.to_string(), text: emit_record_unit(*name, fields) });
            }
        }
    }

    let main_text = emit_main_unit(program, table, &records, &routines, &globals)?;
    Ok(CompiledUnits { records: record_units, main: CompiledUnit { name: "Main".to_string(), text: main_text } })
}

fn emit_record_unit(name: Symbol, fields: &[(Symbol, Type)]) -> String {
    let mut out = String::new();
    out.push_str(&format!(".class public {name}\n.super java/lang/Object\n\n"));
    for (field_name, field_ty) in fields {
        out.push_str(&format!(".field public {field_name} {}\n", descriptor_of(field_ty)));
    }
    out.push('\n');
    out.push_str(".method public <init>()V\n");
    out.push_str("    .limit stack 1\n");
    out.push_str("    .limit locals 1\n");
    out.push_str("    aload_0\n");
    out.push_str("    invokespecial java/lang/Object/<init>()V\n");
    out.push_str("    return\n");
    out.push_str(".end method\n");
    out
}

fn emit_main_unit(
    program: &Program,
    table: &SymbolTable,
    records: &crate::descriptor::RecordDefs,
    routines: &crate::descriptor::RoutineSigs,
    globals: &ilc_util::FxHashMap<Symbol, Type>,
) -> Result<String> {
    let mut out = String::new();
    out.push_str(".class public Main\n.super java/lang/Object\n\n");

    for (name, ty) in globals {
        out.push_str(&format!(".field public static {name} {}\n", descriptor_of(ty)));
    }
    out.push('\n');

    out.push_str(&emit_static_initializer(program, table, records, globals)?);
    out.push('\n');

    let mut user_main: Option<&Statement> = None;
    for stmt in program {
        if let Statement::RoutineDecl { name, .. } = stmt {
            if name.as_str() == "main" {
                user_main = Some(stmt);
                continue;
            }
            out.push_str(&emit_routine(table, records, routines, globals, stmt)?);
            out.push('\n');
        }
    }

    out.push_str(&emit_entry_point(table, records, routines, globals, user_main)?);
    Ok(out)
}

/// `<clinit>`-equivalent: zero-initializes integer/string static fields
/// and allocates record/array fields via their defaults, per spec.md
/// §4.5. Real and boolean fields get the JVM's implicit static-field
/// zero value and need no explicit store.
fn emit_static_initializer(
    program: &Program,
    table: &SymbolTable,
    records: &crate::descriptor::RecordDefs,
    globals: &ilc_util::FxHashMap<Symbol, Type>,
) -> Result<String> {
    let empty_routine_sigs = crate::descriptor::RoutineSigs::default();
    let mut em = Emitter::new(table, records, &empty_routine_sigs, globals);
    for stmt in program {
        match stmt {
            Statement::VarDecl { name, init: None, .. } => {
                if let Some(ty) = globals.get(name) {
                    emit_static_default(&mut em, *name, ty);
                }
            }
            Statement::VarDecl { name, init: Some(init_expr), .. } => {
                if let Some(ty) = globals.get(name) {
                    let init_ty = crate::expr::emit_expr(&mut em, init_expr)?;
                    if ty.is_real() && init_ty.is_integer() {
                        em.emit("i2d");
                    }
                    em.store_var(*name, ty);
                }
            }
            Statement::ArrayDecl { name, .. } => {
                if let Some(ty) = globals.get(name) {
                    emit_static_default(&mut em, *name, ty);
                }
            }
            _ => {}
        }
    }
    let body = em.take_body();

    let mut out = String::new();
    out.push_str(".method static <clinit>()V\n");
    out.push_str(&format!("    .limit stack 8\n    .limit locals 0\n{body}"));
    out.push_str("    return\n.end method\n");
    Ok(out)
}

fn emit_static_default(em: &mut Emitter, name: Symbol, ty: &Type) {
    match ty {
        t if t.is_string() => {
            em.emit("aconst_null");
            em.store_var(name, ty);
        }
        Type::Simple(record_name) if !SymbolTable::is_builtin_type(*record_name) => {
            em.emit(format!("new {record_name}"));
            em.emit("dup");
            em.emit(format!("invokespecial {record_name}/<init>()V"));
            em.store_var(name, ty);
        }
        Type::Array { element, size } => {
            crate::expr::push_int(em, *size);
            if crate::emitter::is_reference_type(element) {
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
            em.store_var(name, ty);
        }
        // integer/boolean/real fields take the JVM's implicit static
        // zero value; nothing to emit.
        _ => {}
    }
}

fn reference_class_name(ty: &Type) -> String {
    match ty {
        Type::Simple(name) if name.as_str() == "string" => "java/lang/String".to_string(),
        Type::Simple(name) => name.to_string(),
        Type::Array { .. } => descriptor_of(ty),
        Type::Record { .. } => unreachable!("anonymous record types never reach codegen"),
    }
}

fn emit_routine(
    table: &SymbolTable,
    records: &crate::descriptor::RecordDefs,
    routines: &crate::descriptor::RoutineSigs,
    globals: &ilc_util::FxHashMap<Symbol, Type>,
    stmt: &Statement,
) -> Result<String> {
    let Statement::RoutineDecl { name, params, body, .. } = stmt else {
        unreachable!("emit_routine is only called on RoutineDecl statements");
    };
    let (param_types, ret) = routines.get(name).cloned().ok_or_else(|| CodegenError::UnknownRoutine(name.to_string()))?;

    let mut em = Emitter::new(table, records, routines, globals);
    for (param, param_ty) in params.iter().zip(param_types.iter()) {
        em.state.declare_local(param.name, param_ty.clone());
    }
    emit_block(&mut em, body)?;
    if ret.is_void() && !ilc_sem::has_return(body) {
        em.emit("return");
    }
    let body_text = em.take_body();

    let descriptor = method_descriptor(&param_types, &ret);
    let mut out = String::new();
    out.push_str(&format!(".method public static {name}{descriptor}\n"));
    out.push_str(&format!("    .limit stack 16\n    .limit locals {}\n", em.state.locals_limit()));
    out.push_str(&body_text);
    out.push_str(".end method\n");
    Ok(out)
}

/// The `main` method the JVM-like runtime invokes: inlines a void user
/// `main`'s body directly, or calls a typed `main` and discards its
/// result, per spec.md §4.5.
fn emit_entry_point(
    table: &SymbolTable,
    records: &crate::descriptor::RecordDefs,
    routines: &crate::descriptor::RoutineSigs,
    globals: &ilc_util::FxHashMap<Symbol, Type>,
    user_main: Option<&Statement>,
) -> Result<String> {
    let mut em = Emitter::new(table, records, routines, globals);
    if let Some(Statement::RoutineDecl { body, return_type, .. }) = user_main {
        if return_type.is_none() {
            emit_block(&mut em, body)?;
        } else {
            let (_, ret) = routines.get(&Symbol::intern("main")).cloned().unwrap_or((Vec::new(), Type::void()));
            em.emit(format!("invokestatic Main/main{}", method_descriptor(&Vec::new(), &ret)));
            if !ret.is_void() {
                em.emit(if ret.is_real() { "pop2" } else { "pop" });
            }
        }
    }
    em.emit("return");
    let body_text = em.take_body();

    let mut out = String::new();
    out.push_str(".method public static main([Ljava/lang/String;)V\n");
    out.push_str(&format!("    .limit stack 16\n    .limit locals {}\n", em.state.locals_limit().max(1)));
    out.push_str(&body_text);
    out.push_str(".end method\n");
    Ok(out)
}
