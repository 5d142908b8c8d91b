//! The IL type descriptor and its compatibility rules.

use ilc_util::Symbol;
use std::fmt;

/// A resolved type. User-named types are expanded to their structural
/// form rather than kept as a back-reference, so a `Record` can never
/// participate in a reference cycle (spec.md §9's re-design directive).
/// `Record` keeps the name it was declared under: spec.md §259 makes IL
/// records nominal, so two records with identical field layouts but
/// different declared names must stay incompatible.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Simple(Symbol),
    Array {
        element: Box<Type>,
        size: i32,
    },
    Record {
        name: Symbol,
        fields: Vec<(Symbol, Type)>,
    },
}

impl Type {
    pub fn integer() -> Type {
        Type::Simple(Symbol::intern("integer"))
    }

    pub fn real() -> Type {
        Type::Simple(Symbol::intern("real"))
    }

    pub fn boolean() -> Type {
        Type::Simple(Symbol::intern("boolean"))
    }

    pub fn string() -> Type {
        Type::Simple(Symbol::intern("string"))
    }

    pub fn void() -> Type {
        Type::Simple(Symbol::intern("void"))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Simple(s) if s.as_str() == "integer")
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Type::Simple(s) if s.as_str() == "real")
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_real()
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Simple(s) if s.as_str() == "boolean")
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Simple(s) if s.as_str() == "string")
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Simple(s) if s.as_str() == "void")
    }

    pub fn fields(&self) -> Option<&[(Symbol, Type)]> {
        match self {
            Type::Record { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Field lookup on a record type.
    pub fn field(&self, name: Symbol) -> Option<&Type> {
        self.fields()?.iter().find(|(n, _)| *n == name).map(|(_, t)| t)
    }

    /// Per spec.md §3: identical `Simple` names are compatible; `real`
    /// accepts `integer`; `Array` matches only on identical size and a
    /// compatible element type; `Record` vs. `Record` requires the same
    /// declared name — IL records are nominal, not structural, so two
    /// unrelated records with identical field layouts are incompatible.
    pub fn is_compatible_with(&self, target: &Type) -> bool {
        match (self, target) {
            (Type::Simple(a), Type::Simple(b)) if a == b => true,
            (Type::Simple(a), Type::Simple(b))
                if a.as_str() == "integer" && b.as_str() == "real" =>
            {
                true
            }
            (
                Type::Array { element: e1, size: s1 },
                Type::Array { element: e2, size: s2 },
            ) => s1 == s2 && e1.is_compatible_with(e2),
            (Type::Record { name: n1, .. }, Type::Record { name: n2, .. }) => n1 == n2,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(name) => write!(f, "{name}"),
            Type::Array { element, size } => write!(f, "array[{size}] {element}"),
            Type::Record { name, .. } => write!(f, "{name}"),
        }
    }
}

/// A routine's call signature, as registered in the routines namespace.
#[derive(Debug, Clone)]
pub struct RoutineSig {
    pub params: Vec<Type>,
    pub return_type: Option<Type>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_is_compatible_with_real() {
        assert!(Type::integer().is_compatible_with(&Type::real()));
    }

    #[test]
    fn real_is_not_compatible_with_integer() {
        assert!(!Type::real().is_compatible_with(&Type::integer()));
    }

    #[test]
    fn identical_simple_types_are_compatible() {
        assert!(Type::boolean().is_compatible_with(&Type::boolean()));
    }

    #[test]
    fn arrays_require_identical_size_and_element_type() {
        let a = Type::Array { element: Box::new(Type::integer()), size: 5 };
        let b = Type::Array { element: Box::new(Type::integer()), size: 5 };
        let c = Type::Array { element: Box::new(Type::integer()), size: 6 };
        assert!(a.is_compatible_with(&b));
        assert!(!a.is_compatible_with(&c));
    }

    #[test]
    fn unrelated_simple_types_are_incompatible() {
        assert!(!Type::boolean().is_compatible_with(&Type::integer()));
    }

    #[test]
    fn record_field_lookup() {
        let rec = Type::Record {
            name: Symbol::intern("Point"),
            fields: vec![(Symbol::intern("x"), Type::integer())],
        };
        assert!(rec.field(Symbol::intern("x")).is_some());
        assert!(rec.field(Symbol::intern("y")).is_none());
    }

    #[test]
    fn records_with_same_fields_but_different_names_are_incompatible() {
        let point = Type::Record {
            name: Symbol::intern("Point"),
            fields: vec![(Symbol::intern("x"), Type::integer()), (Symbol::intern("y"), Type::integer())],
        };
        let vector = Type::Record {
            name: Symbol::intern("Vector"),
            fields: vec![(Symbol::intern("x"), Type::integer()), (Symbol::intern("y"), Type::integer())],
        };
        assert!(!point.is_compatible_with(&vector));
    }

    #[test]
    fn records_with_same_name_are_compatible() {
        let a = Type::Record { name: Symbol::intern("Point"), fields: vec![(Symbol::intern("x"), Type::integer())] };
        let b = Type::Record { name: Symbol::intern("Point"), fields: vec![(Symbol::intern("x"), Type::integer())] };
        assert!(a.is_compatible_with(&b));
    }
}
