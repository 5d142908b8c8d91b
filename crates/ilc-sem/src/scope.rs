//! Symbol table: three namespaces per spec.md §3 — routines and types
//! flat and program-wide, variables a stack of scopes with most-local-
//! first lookup. A plain `Vec<FxHashMap<Symbol, Type>>` rather than the
//! teacher's rib-tree-with-parent-links: spec.md §9 explicitly calls a
//! vector of maps sufficient ("lookups remain O(scope-depth) which is
//! fine"), and IL scopes nest and pop strictly, never needing to resume
//! a closed-over parent after the fact.

use crate::types::{RoutineSig, Type};
use ilc_util::{FxHashMap, Symbol};

pub struct SymbolTable {
    routines: FxHashMap<Symbol, RoutineSig>,
    types: FxHashMap<Symbol, Type>,
    variables: Vec<FxHashMap<Symbol, Type>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut types = FxHashMap::default();
        for name in ["integer", "real", "boolean", "string", "void"] {
            types.insert(Symbol::intern(name), Type::Simple(Symbol::intern(name)));
        }
        Self {
            routines: FxHashMap::default(),
            types,
            variables: vec![FxHashMap::default()],
        }
    }

    pub fn is_builtin_type(name: Symbol) -> bool {
        matches!(
            name.as_str(),
            "integer" | "real" | "boolean" | "string" | "void"
        )
    }

    // -- routines --------------------------------------------------------

    /// Returns `false` if `name` was already registered.
    pub fn declare_routine(&mut self, name: Symbol, sig: RoutineSig) -> bool {
        if self.routines.contains_key(&name) {
            return false;
        }
        self.routines.insert(name, sig);
        true
    }

    pub fn lookup_routine(&self, name: Symbol) -> Option<&RoutineSig> {
        self.routines.get(&name)
    }

    // -- types -------------------------------------------------------------

    /// Returns `false` if `name` collides with a built-in or an
    /// already-declared user type.
    pub fn declare_type(&mut self, name: Symbol, ty: Type) -> bool {
        if self.types.contains_key(&name) {
            return false;
        }
        self.types.insert(name, ty);
        true
    }

    pub fn lookup_type(&self, name: Symbol) -> Option<&Type> {
        self.types.get(&name)
    }

    // -- variables ---------------------------------------------------------

    pub fn push_scope(&mut self) {
        self.variables.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.variables.pop();
        debug_assert!(!self.variables.is_empty(), "popped the global scope");
    }

    /// Returns `false` if `name` is already declared in the *current*
    /// (innermost) scope — shadowing an outer scope's variable is fine,
    /// redeclaring within the same scope is not.
    pub fn declare_var(&mut self, name: Symbol, ty: Type) -> bool {
        let scope = self.variables.last_mut().expect("at least one scope");
        if scope.contains_key(&name) {
            return false;
        }
        scope.insert(name, ty);
        true
    }

    pub fn lookup_var(&self, name: Symbol) -> Option<&Type> {
        self.variables.iter().rev().find_map(|scope| scope.get(&name))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_types_are_preloaded() {
        let table = SymbolTable::new();
        assert!(table.lookup_type(Symbol::intern("integer")).is_some());
    }

    #[test]
    fn duplicate_type_declaration_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(!table.declare_type(Symbol::intern("integer"), Type::integer()));
    }

    #[test]
    fn variable_shadowing_across_scopes_is_allowed() {
        let mut table = SymbolTable::new();
        table.declare_var(Symbol::intern("x"), Type::integer());
        table.push_scope();
        assert!(table.declare_var(Symbol::intern("x"), Type::real()));
        assert_eq!(table.lookup_var(Symbol::intern("x")), Some(&Type::real()));
        table.pop_scope();
        assert_eq!(table.lookup_var(Symbol::intern("x")), Some(&Type::integer()));
    }

    #[test]
    fn redeclaration_within_same_scope_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.declare_var(Symbol::intern("x"), Type::integer()));
        assert!(!table.declare_var(Symbol::intern("x"), Type::real()));
    }

    #[test]
    fn routine_lookup_after_declaration() {
        let mut table = SymbolTable::new();
        let sig = RoutineSig { params: vec![Type::integer()], return_type: Some(Type::integer()) };
        assert!(table.declare_routine(Symbol::intern("f"), sig));
        assert!(table.lookup_routine(Symbol::intern("f")).is_some());
    }
}
