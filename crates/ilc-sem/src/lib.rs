//! Semantic analysis: name resolution, type checking, and the symbol
//! table that `ilc-gen` consumes afterwards.
//!
//! The analyzer walks the AST `ilc-par` produces directly — there is no
//! separate typed IR. Analysis runs in five passes (see
//! [`analysis::analyze`]) so that a routine can call another routine
//! declared later in the same program, and a variable can be declared
//! in terms of a type declared later at the top level.

pub mod analysis;
pub mod scope;
pub mod types;

pub use analysis::{analyze, has_return, Analyzer};
pub use scope::SymbolTable;
pub use types::{RoutineSig, Type};
