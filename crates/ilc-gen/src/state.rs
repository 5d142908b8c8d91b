//! Per-method mutable state the emitter threads through lowering: a
//! label counter and a dense local-slot allocator. Carried explicitly
//! rather than as process-global statics (the Design Notes' "no global
//! mutable state" re-design directive).

use ilc_sem::Type;
use ilc_util::{FxHashMap, Symbol};

use crate::descriptor::slot_width;

#[derive(Default)]
pub struct EmitterState {
    label_counter: u32,
    locals: FxHashMap<Symbol, (u16, Type)>,
    next_slot: u16,
}

impl EmitterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh, method-unique label built from `prefix`.
    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let n = self.label_counter;
        self.label_counter += 1;
        format!("{prefix}_{n}")
    }

    /// Assigns the next free slot(s) to `name`. Reals consume two
    /// consecutive indices; everything else consumes one.
    pub fn declare_local(&mut self, name: Symbol, ty: Type) -> u16 {
        let slot = self.next_slot;
        self.next_slot += slot_width(&ty);
        self.locals.insert(name, (slot, ty));
        slot
    }

    pub fn local(&self, name: Symbol) -> Option<&(u16, Type)> {
        self.locals.get(&name)
    }

    /// The `.limit locals` value: slot count, with spec.md §4.5's
    /// floor of 5 even for trivial methods.
    pub fn locals_limit(&self) -> u16 {
        self.next_slot.max(5)
    }
}
