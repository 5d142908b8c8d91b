//! Global string interner backing [`super::Symbol`].
//!
//! The compiler is single-threaded (see the driver's concurrency model),
//! so a process-wide interner guarded by a single lock is sufficient; it
//! is the one piece of intentional global state in the workspace, kept
//! exactly because symbol identity must be process-stable.

use super::Symbol;
use rustc_hash::FxHashMap;
use std::sync::{OnceLock, RwLock};

pub struct Interner {
    strings: Vec<&'static str>,
    lookup: FxHashMap<&'static str, u32>,
    arena: bumpalo::Bump,
}

// SAFETY: all access to `Interner` goes through the `RwLock` in
// `INTERNER` below, which provides the exclusion that `Bump`'s internal
// `Cell`s need across threads.
unsafe impl Sync for Interner {}

impl Interner {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
            arena: bumpalo::Bump::new(),
        }
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&id) = self.lookup.get(s) {
            return Symbol(id);
        }
        // SAFETY: the arena lives as long as the process-global interner,
        // which is never torn down, so this borrow is effectively 'static.
        let copied: &'static str =
            unsafe { std::mem::transmute::<&str, &'static str>(self.arena.alloc_str(s)) };
        let id = self.strings.len() as u32;
        self.strings.push(copied);
        self.lookup.insert(copied, id);
        Symbol(id)
    }

    pub fn resolve(&self, sym: Symbol) -> &'static str {
        self.strings[sym.0 as usize]
    }
}

static INTERNER: OnceLock<RwLock<Interner>> = OnceLock::new();

pub(super) fn with_interner<R>(f: impl FnOnce(&mut Interner) -> R) -> R {
    let lock = INTERNER.get_or_init(|| RwLock::new(Interner::new()));
    let mut guard = lock.write().expect("symbol interner lock poisoned");
    f(&mut guard)
}
