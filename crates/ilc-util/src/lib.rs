//! ilc-util - Shared foundation types for the IL compiler.
//!
//! Every other crate in the workspace depends on this one. It owns the
//! three cross-cutting concerns that would otherwise force global mutable
//! state: string interning ([`Symbol`]), source location tracking
//! ([`Span`], [`SourceMap`]), and diagnostic collection ([`Handler`]).

pub mod diagnostic;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Kind, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
