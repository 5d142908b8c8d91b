//! Expression lowering: stack-discipline codegen for every [`Expression`]
//! variant, per spec.md §4.5. `emit_expr` both appends instructions to
//! the emitter's buffer and returns the pushed value's type, so callers
//! (assignment targets, argument binding, string concatenation) can
//! decide on int-to-real promotion without re-walking the AST.

use ilc_par::ast::{BinOp, Expression, UnOp};
use ilc_sem::Type;

use crate::descriptor::{descriptor_of, method_descriptor, resolve_type_expr};
use crate::emitter::{array_load_op, is_reference_type, Emitter};
use crate::error::{CodegenError, Result};

pub(crate) fn emit_expr(em: &mut Emitter, expr: &Expression) -> Result<Type> {
    match expr {
        Expression::IntegerLit(n, _) => {
            push_int(em, *n);
            Ok(Type::integer())
        }
        Expression::RealLit(f, _) => {
            em.emit(format!("ldc2_w {f}"));
            Ok(Type::real())
        }
        Expression::BooleanLit(b, _) => {
            em.emit(if *b { "iconst_1" } else { "iconst_0" });
            Ok(Type::boolean())
        }
        Expression::StringLit(s, _) => {
            em.emit(format!("ldc \"{}\"", escape_string(s)));
            Ok(Type::string())
        }
        Expression::VarRef(name, _) => {
            let ty = em.type_of_name(*name)?;
            em.load_var(*name, &ty);
            Ok(ty)
        }
        Expression::ArrayAccess { name, index, .. } => {
            let arr_ty = em.type_of_name(*name)?;
            let Type::Array { element, .. } = &arr_ty else {
                return Err(CodegenError::UnsupportedType(format!("'{name}' is not an array")));
            };
            em.load_var(*name, &arr_ty);
            emit_expr(em, index)?;
            em.emit(array_load_op(element));
            Ok((**element).clone())
        }
        Expression::RecordAccess { record, field, .. } => {
            let record_ty = emit_expr(em, record)?;
            let Type::Simple(record_name) = &record_ty else {
                return Err(CodegenError::UnsupportedType("field access on a non-record value".into()));
            };
            let field_ty = em.record_field_type(*record_name, *field)?;
            em.emit(format!("getfield {record_name}/{field} {}", descriptor_of(&field_ty)));
            Ok(field_ty)
        }
        Expression::Unary { op, operand, .. } => emit_unary(em, *op, operand),
        Expression::Binary { left, op, right, .. } => emit_binary(em, left, *op, right),
        Expression::RoutineCall { name, args, .. } => emit_call(em, *name, args),
        Expression::TypeCast { expr, target_type, .. } => {
            let target = resolve_type_expr(target_type, em.table)?;
            let source = emit_expr(em, expr)?;
            if target.is_real() && source.is_integer() {
                em.emit("i2d");
            } else if target.is_integer() && source.is_real() {
                em.emit("d2i");
            }
            Ok(target)
        }
    }
}

pub(crate) fn emit_call(em: &mut Emitter, name: ilc_util::Symbol, args: &[Expression]) -> Result<Type> {
    let (params, ret) = em
        .routines
        .get(&name)
        .cloned()
        .ok_or_else(|| CodegenError::UnknownRoutine(name.to_string()))?;
    for (arg, param_ty) in args.iter().zip(params.iter()) {
        let arg_ty = emit_expr(em, arg)?;
        if param_ty.is_real() && arg_ty.is_integer() {
            em.emit("i2d");
        }
    }
    em.emit(format!("invokestatic Main/{name}{}", method_descriptor(&params, &ret)));
    Ok(ret)
}

fn emit_unary(em: &mut Emitter, op: UnOp, operand: &Expression) -> Result<Type> {
    let ty = emit_expr(em, operand)?;
    match op {
        UnOp::Neg => {
            em.emit(if ty.is_real() { "dneg" } else { "ineg" });
            Ok(ty)
        }
        UnOp::Not => {
            em.emit("iconst_1");
            em.emit("ixor");
            Ok(Type::boolean())
        }
    }
}

fn emit_binary(em: &mut Emitter, left: &Expression, op: BinOp, right: &Expression) -> Result<Type> {
    match op {
        BinOp::Add if is_string_concat(em, left, right)? => emit_concat(em, left, right),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => emit_arithmetic(em, left, op, right),
        BinOp::Eq | BinOp::NotEq | BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => {
            emit_comparison(em, left, op, right)
        }
        BinOp::And => emit_and_or(em, left, right, true),
        BinOp::Or => emit_and_or(em, left, right, false),
        BinOp::Xor => {
            emit_expr(em, left)?;
            emit_expr(em, right)?;
            em.emit("ixor");
            Ok(Type::boolean())
        }
    }
}

fn is_string_concat(em: &Emitter, left: &Expression, right: &Expression) -> Result<bool> {
    Ok(infer_type(em, left)?.is_string() || infer_type(em, right)?.is_string())
}

fn emit_arithmetic(em: &mut Emitter, left: &Expression, op: BinOp, right: &Expression) -> Result<Type> {
    let lty = infer_type(em, left)?;
    let rty = infer_type(em, right)?;
    let result_ty = if lty.is_integer() && rty.is_integer() { Type::integer() } else { Type::real() };

    emit_expr(em, left)?;
    if result_ty.is_real() && lty.is_integer() {
        em.emit("i2d");
    }
    emit_expr(em, right)?;
    if result_ty.is_real() && rty.is_integer() {
        em.emit("i2d");
    }

    let mnemonic = match (op, result_ty.is_real()) {
        (BinOp::Add, false) => "iadd",
        (BinOp::Add, true) => "dadd",
        (BinOp::Sub, false) => "isub",
        (BinOp::Sub, true) => "dsub",
        (BinOp::Mul, false) => "imul",
        (BinOp::Mul, true) => "dmul",
        (BinOp::Div, false) => "idiv",
        (BinOp::Div, true) => "ddiv",
        (BinOp::Mod, false) => "irem",
        (BinOp::Mod, true) => "drem",
        _ => unreachable!("only arithmetic ops reach emit_arithmetic"),
    };
    em.emit(mnemonic);
    Ok(result_ty)
}

fn emit_comparison(em: &mut Emitter, left: &Expression, op: BinOp, right: &Expression) -> Result<Type> {
    let lty = infer_type(em, left)?;
    let rty = infer_type(em, right)?;
    let numeric = lty.is_numeric() && rty.is_numeric();
    let real = numeric && (lty.is_real() || rty.is_real());

    emit_expr(em, left)?;
    if real && lty.is_integer() {
        em.emit("i2d");
    }
    emit_expr(em, right)?;
    if real && rty.is_integer() {
        em.emit("i2d");
    }

    let true_label = em.state.fresh_label("cmp_true");
    let end_label = em.state.fresh_label("cmp_end");

    if real {
        em.emit("dcmpg");
        em.emit(format!("{} {true_label}", int_branch_mnemonic(op)));
    } else if numeric || !is_reference_type(&lty) {
        em.emit(format!("{} {true_label}", int_cmp_mnemonic(op)));
    } else {
        em.emit(format!("{} {true_label}", ref_cmp_mnemonic(op)));
    }
    em.emit("iconst_0");
    em.emit(format!("goto {end_label}"));
    em.emit_label(&true_label);
    em.emit("iconst_1");
    em.emit_label(&end_label);
    Ok(Type::boolean())
}

/// Branch mnemonic used after `dcmpg` has left a tri-state int on the
/// stack (−1/0/1): the comparison becomes an ordinary `if<cond>`.
fn int_branch_mnemonic(op: BinOp) -> &'static str {
    match op {
        BinOp::Eq => "ifeq",
        BinOp::NotEq => "ifne",
        BinOp::Less => "iflt",
        BinOp::LessEq => "ifle",
        BinOp::Greater => "ifgt",
        BinOp::GreaterEq => "ifge",
        _ => unreachable!("only comparison ops reach int_branch_mnemonic"),
    }
}

/// Two-operand integer comparison, used directly on a pair of ints
/// (spec.md §4.5 names `if_icmpgt`/`if_icmplt` for the for-loop bound
/// check; the remaining four follow the same family).
fn int_cmp_mnemonic(op: BinOp) -> &'static str {
    match op {
        BinOp::Eq => "if_icmpeq",
        BinOp::NotEq => "if_icmpne",
        BinOp::Less => "if_icmplt",
        BinOp::LessEq => "if_icmple",
        BinOp::Greater => "if_icmpgt",
        BinOp::GreaterEq => "if_icmpge",
        _ => unreachable!("only comparison ops reach int_cmp_mnemonic"),
    }
}

/// Reference equality for the two non-numeric comparable forms
/// semantic analysis allows (`string`/`string` and `record`/`record` of
/// identical declared type) — only `=`/`/=` ever reach this arm.
fn ref_cmp_mnemonic(op: BinOp) -> &'static str {
    match op {
        BinOp::Eq => "if_acmpeq",
        BinOp::NotEq => "if_acmpne",
        _ => unreachable!("only equality ops compare non-numeric operands"),
    }
}

fn emit_and_or(em: &mut Emitter, left: &Expression, right: &Expression, is_and: bool) -> Result<Type> {
    let short_circuit_label = em.state.fresh_label(if is_and { "and_false" } else { "or_true" });
    let end_label = em.state.fresh_label("logic_end");
    let branch = if is_and { "ifeq" } else { "ifne" };

    emit_expr(em, left)?;
    em.emit(format!("{branch} {short_circuit_label}"));
    emit_expr(em, right)?;
    em.emit(format!("{branch} {short_circuit_label}"));
    em.emit(if is_and { "iconst_1" } else { "iconst_0" });
    em.emit(format!("goto {end_label}"));
    em.emit_label(&short_circuit_label);
    em.emit(if is_and { "iconst_0" } else { "iconst_1" });
    em.emit_label(&end_label);
    Ok(Type::boolean())
}

/// Flattens a left-associative chain of string-concatenating `+`
/// operators into its operands (left-first), stopping at any
/// subexpression whose own combined type isn't string — a numeric
/// sub-addition like `(1 + 2) + "x"` is one atomic operand, not two.
fn flatten_concat<'e>(em: &Emitter, expr: &'e Expression, operands: &mut Vec<&'e Expression>) -> Result<()> {
    if let Expression::Binary { left, op: BinOp::Add, right, .. } = expr {
        if infer_type(em, left)?.is_string() || infer_type(em, right)?.is_string() {
            flatten_concat(em, left, operands)?;
            operands.push(right);
            return Ok(());
        }
    }
    operands.push(expr);
    Ok(())
}

fn emit_concat(em: &mut Emitter, left: &Expression, right: &Expression) -> Result<Type> {
    let mut operands = Vec::new();
    flatten_concat(em, left, &mut operands)?;
    flatten_concat(em, right, &mut operands)?;

    em.emit("new java/lang/StringBuilder");
    em.emit("dup");
    em.emit("invokespecial java/lang/StringBuilder/<init>()V");
    for operand in operands {
        let ty = emit_expr(em, operand)?;
        em.emit(format!("invokevirtual java/lang/StringBuilder/append{}", append_descriptor(&ty)));
    }
    em.emit("invokevirtual java/lang/StringBuilder/toString()Ljava/lang/String;");
    Ok(Type::string())
}

fn append_descriptor(ty: &Type) -> &'static str {
    if ty.is_integer() {
        "(I)Ljava/lang/StringBuilder;"
    } else if ty.is_real() {
        "(D)Ljava/lang/StringBuilder;"
    } else if ty.is_boolean() {
        "(Z)Ljava/lang/StringBuilder;"
    } else if ty.is_string() {
        "(Ljava/lang/String;)Ljava/lang/StringBuilder;"
    } else {
        "(Ljava/lang/Object;)Ljava/lang/StringBuilder;"
    }
}

/// Integer-literal opcode selection by magnitude: constant-pool-free
/// forms first (`iconst`, `bipush`, `sipush`), falling back to `ldc`.
pub(crate) fn push_int(em: &mut Emitter, n: i32) {
    match n {
        -1..=5 => em.emit(format!("iconst_{}", if n == -1 { "m1".to_string() } else { n.to_string() })),
        -128..=127 => em.emit(format!("bipush {n}")),
        -32768..=32767 => em.emit(format!("sipush {n}")),
        _ => em.emit(format!("ldc {n}")),
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Pure type inference over an already-validated program: no side
/// effects, used ahead of emission to decide int/real promotion and to
/// recognize a string-concatenating `+` before committing to either
/// lowering path.
pub(crate) fn infer_type(em: &Emitter, expr: &Expression) -> Result<Type> {
    match expr {
        Expression::IntegerLit(..) => Ok(Type::integer()),
        Expression::RealLit(..) => Ok(Type::real()),
        Expression::BooleanLit(..) => Ok(Type::boolean()),
        Expression::StringLit(..) => Ok(Type::string()),
        Expression::VarRef(name, _) => em.type_of_name(*name),
        Expression::ArrayAccess { name, .. } => match em.type_of_name(*name)? {
            Type::Array { element, .. } => Ok(*element),
            other => Err(CodegenError::UnsupportedType(format!("{other} is not an array"))),
        },
        Expression::RecordAccess { record, field, .. } => {
            let record_ty = infer_type(em, record)?;
            let Type::Simple(record_name) = record_ty else {
                return Err(CodegenError::UnsupportedType("field access on a non-record value".into()));
            };
            em.record_field_type(record_name, *field)
        }
        Expression::Unary { op, operand, .. } => match op {
            UnOp::Neg => infer_type(em, operand),
            UnOp::Not => Ok(Type::boolean()),
        },
        Expression::Binary { left, op, right, .. } => infer_binary_type(em, left, *op, right),
        Expression::RoutineCall { name, .. } => em
            .routines
            .get(name)
            .map(|(_, ret)| ret.clone())
            .ok_or_else(|| CodegenError::UnknownRoutine(name.to_string())),
        Expression::TypeCast { target_type, .. } => resolve_type_expr(target_type, em.table),
    }
}

fn infer_binary_type(em: &Emitter, left: &Expression, op: BinOp, right: &Expression) -> Result<Type> {
    let lty = infer_type(em, left)?;
    let rty = infer_type(em, right)?;
    Ok(match op {
        BinOp::Add if lty.is_string() || rty.is_string() => Type::string(),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            if lty.is_integer() && rty.is_integer() {
                Type::integer()
            } else {
                Type::real()
            }
        }
        BinOp::Eq | BinOp::NotEq | BinOp::Less | BinOp::LessEq | BinOp::Greater | BinOp::GreaterEq => Type::boolean(),
        BinOp::And | BinOp::Or | BinOp::Xor => Type::boolean(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{RecordDefs, RoutineSigs};
    use ilc_sem::SymbolTable;
    use ilc_util::{FxHashMap, Span, Symbol};

    fn fresh_emitter<'a>(
        table: &'a SymbolTable,
        records: &'a RecordDefs,
        routines: &'a RoutineSigs,
        globals: &'a FxHashMap<Symbol, Type>,
    ) -> Emitter<'a> {
        Emitter::new(table, records, routines, globals)
    }

    #[test]
    fn small_integer_literal_uses_iconst() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        let ty = emit_expr(&mut em, &Expression::IntegerLit(3, Span::DUMMY)).unwrap();
        assert!(ty.is_integer());
        assert!(em.take_body().contains("iconst_3"));
    }

    #[test]
    fn large_integer_literal_uses_ldc() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        emit_expr(&mut em, &Expression::IntegerLit(100_000, Span::DUMMY)).unwrap();
        assert!(em.take_body().contains("ldc 100000"));
    }

    #[test]
    fn mixed_addition_promotes_integer_operand_to_real() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        let expr = Expression::Binary {
            left: Box::new(Expression::IntegerLit(1, Span::DUMMY)),
            op: BinOp::Add,
            right: Box::new(Expression::RealLit(2.5, Span::DUMMY)),
            span: Span::DUMMY,
        };
        let ty = emit_expr(&mut em, &expr).unwrap();
        assert!(ty.is_real());
        let body = em.take_body();
        assert!(body.contains("i2d"));
        assert!(body.contains("dadd"));
    }

    #[test]
    fn string_concatenation_uses_string_builder() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        let expr = Expression::Binary {
            left: Box::new(Expression::StringLit("a".into(), Span::DUMMY)),
            op: BinOp::Add,
            right: Box::new(Expression::StringLit("b".into(), Span::DUMMY)),
            span: Span::DUMMY,
        };
        let ty = emit_expr(&mut em, &expr).unwrap();
        assert!(ty.is_string());
        let body = em.take_body();
        assert!(body.contains("StringBuilder"));
        assert!(body.contains("toString"));
    }

    #[test]
    fn nested_numeric_addition_inside_concat_is_one_operand() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        // (1 + 2) + "x": the numeric sub-addition must still fold to a
        // single `iadd`, not get flattened into the string operand list.
        let inner = Expression::Binary {
            left: Box::new(Expression::IntegerLit(1, Span::DUMMY)),
            op: BinOp::Add,
            right: Box::new(Expression::IntegerLit(2, Span::DUMMY)),
            span: Span::DUMMY,
        };
        let expr = Expression::Binary {
            left: Box::new(inner),
            op: BinOp::Add,
            right: Box::new(Expression::StringLit("x".into(), Span::DUMMY)),
            span: Span::DUMMY,
        };
        emit_expr(&mut em, &expr).unwrap();
        let body = em.take_body();
        assert!(body.contains("iadd"));
    }

    #[test]
    fn logical_and_short_circuits_on_false() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        let expr = Expression::Binary {
            left: Box::new(Expression::BooleanLit(false, Span::DUMMY)),
            op: BinOp::And,
            right: Box::new(Expression::BooleanLit(true, Span::DUMMY)),
            span: Span::DUMMY,
        };
        let ty = emit_expr(&mut em, &expr).unwrap();
        assert!(ty.is_boolean());
        assert!(em.take_body().contains("ifeq"));
    }

    #[test]
    fn comparison_brackets_a_zero_or_one_push() {
        let table = SymbolTable::new();
        let records = RecordDefs::default();
        let routines = RoutineSigs::default();
        let globals = FxHashMap::default();
        let mut em = fresh_emitter(&table, &records, &routines, &globals);
        let expr = Expression::Binary {
            left: Box::new(Expression::IntegerLit(1, Span::DUMMY)),
            op: BinOp::Less,
            right: Box::new(Expression::IntegerLit(2, Span::DUMMY)),
            span: Span::DUMMY,
        };
        let ty = emit_expr(&mut em, &expr).unwrap();
        assert!(ty.is_boolean());
        let body = em.take_body();
        assert!(body.contains("if_icmplt"));
        assert!(body.contains("iconst_0"));
        assert!(body.contains("iconst_1"));
    }
}
