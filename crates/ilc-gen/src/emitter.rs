//! The per-method emission context: the symbol information codegen
//! needs at any point while lowering a routine body, plus the output
//! buffer the lowering functions in [`crate::expr`] and [`crate::stmt`]
//! append to.

use ilc_sem::{SymbolTable, Type};
use ilc_util::{FxHashMap, Symbol};

use crate::descriptor::{descriptor_of, RecordDefs, RoutineSigs};
use crate::error::{CodegenError, Result};
use crate::state::EmitterState;

pub struct Emitter<'a> {
    pub table: &'a SymbolTable,
    pub records: &'a RecordDefs,
    pub routines: &'a RoutineSigs,
    pub globals: &'a FxHashMap<Symbol, Type>,
    pub state: EmitterState,
    body: String,
}

impl<'a> Emitter<'a> {
    pub fn new(
        table: &'a SymbolTable,
        records: &'a RecordDefs,
        routines: &'a RoutineSigs,
        globals: &'a FxHashMap<Symbol, Type>,
    ) -> Self {
        Self { table, records, routines, globals, state: EmitterState::new(), body: String::new() }
    }

    pub fn emit(&mut self, line: impl AsRef<str>) {
        self.body.push_str("    ");
        self.body.push_str(line.as_ref());
        self.body.push('\n');
    }

    pub fn emit_label(&mut self, label: &str) {
        self.body.push_str(label);
        self.body.push_str(":\n");
    }

    /// Hands back everything emitted so far, leaving the buffer empty
    /// for the next method.
    pub fn take_body(&mut self) -> String {
        std::mem::take(&mut self.body)
    }

    /// A name's type: the per-method local-slot map first, then the
    /// program's static fields. Every `VarRef` in a validated program
    /// resolves to one or the other.
    pub fn type_of_name(&self, name: Symbol) -> Result<Type> {
        if let Some((_, ty)) = self.state.local(name) {
            return Ok(ty.clone());
        }
        self.globals.get(&name).cloned().ok_or_else(|| CodegenError::UnknownType(name.to_string()))
    }

    pub fn record_field_type(&self, record: Symbol, field: Symbol) -> Result<Type> {
        let fields = self
            .records
            .get(&record)
            .ok_or_else(|| CodegenError::UnknownRecord(record.to_string()))?;
        fields
            .iter()
            .find(|(n, _)| *n == field)
            .map(|(_, ty)| ty.clone())
            .ok_or_else(|| CodegenError::UnknownType(format!("{record}.{field}")))
    }

    /// Pushes the value of `name` (local `iload`/`dload`/`aload` by
    /// slot, or `getstatic` for a top-level name) onto the stack.
    pub fn load_var(&mut self, name: Symbol, ty: &Type) {
        if let Some((slot, _)) = self.state.local(name) {
            let slot = *slot;
            self.emit(format!("{} {slot}", load_op(ty)));
        } else {
            self.emit(format!("getstatic Main/{name} {}", descriptor_of(ty)));
        }
    }

    /// Pops the top of stack into `name` (local `istore`/`dstore`/
    /// `astore`, or `putstatic`).
    pub fn store_var(&mut self, name: Symbol, ty: &Type) {
        if let Some((slot, _)) = self.state.local(name) {
            let slot = *slot;
            self.emit(format!("{} {slot}", store_op(ty)));
        } else {
            self.emit(format!("putstatic Main/{name} {}", descriptor_of(ty)));
        }
    }
}

/// `true` for types that live on the heap (string, array, record) and
/// so use the reference-typed family of opcodes rather than the
/// int/double family — records are carried as `Type::Simple` with a
/// non-builtin name, so this is the one place that distinction matters.
pub(crate) fn is_reference_type(ty: &Type) -> bool {
    match ty {
        Type::Array { .. } => true,
        Type::Simple(name) => name.as_str() == "string" || !SymbolTable::is_builtin_type(*name),
        Type::Record { .. } => unreachable!("anonymous record types never reach codegen"),
    }
}

pub(crate) fn load_op(ty: &Type) -> &'static str {
    if ty.is_real() {
        "dload"
    } else if is_reference_type(ty) {
        "aload"
    } else {
        "iload"
    }
}

pub(crate) fn store_op(ty: &Type) -> &'static str {
    if ty.is_real() {
        "dstore"
    } else if is_reference_type(ty) {
        "astore"
    } else {
        "istore"
    }
}

pub(crate) fn array_load_op(element: &Type) -> &'static str {
    if element.is_real() {
        "daload"
    } else if is_reference_type(element) {
        "aaload"
    } else {
        "iaload"
    }
}

pub(crate) fn array_store_op(element: &Type) -> &'static str {
    if element.is_real() {
        "dastore"
    } else if is_reference_type(element) {
        "aastore"
    } else {
        "iastore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_uses_the_double_opcode_family() {
        assert_eq!(load_op(&Type::real()), "dload");
        assert_eq!(store_op(&Type::real()), "dstore");
    }

    #[test]
    fn record_name_is_a_reference_type() {
        let point = Type::Simple(Symbol::intern("Point"));
        assert!(is_reference_type(&point));
        assert_eq!(load_op(&point), "aload");
    }

    #[test]
    fn array_element_ops_pick_the_matching_family() {
        assert_eq!(array_load_op(&Type::integer()), "iaload");
        assert_eq!(array_load_op(&Type::real()), "daload");
        assert_eq!(array_store_op(&Type::string()), "aastore");
    }
}
