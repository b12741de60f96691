//! Built-in subroutine vocabulary.
//!
//! `MAIN`, `READ` and `WRITE` are pre-declared in every program's global scope and are reserved: redeclaring one is
//! a semantic error distinct from an ordinary duplicate declaration.
//!
//! ## Notes
//! - `READ` and `WRITE` are variadic: they accept any number of arguments and are expanded inline instead of being
//!   called.
//!
//! ## Examples
//! ```rust
//! use vascal_core::lang::builtins::{self, BuiltinProcId};
//!
//! assert_eq!(builtins::from_str("WRITE"), Some(BuiltinProcId::Write));
//! assert!(builtins::info_for(BuiltinProcId::Write).variadic);
//! ```

/// Stable identifier for every built-in subroutine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinProcId {
    Main,
    Read,
    Write,
}

/// Metadata for a built-in subroutine.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinProcInfo {
    pub id: BuiltinProcId,
    pub canonical: &'static str,
    pub variadic: bool,
}

/// Registry of built-in subroutines, in pre-declaration order.
pub const BUILTIN_PROCEDURES: &[BuiltinProcInfo] = &[
    BuiltinProcInfo {
        id: BuiltinProcId::Main,
        canonical: "MAIN",
        variadic: false,
    },
    BuiltinProcInfo {
        id: BuiltinProcId::Read,
        canonical: "READ",
        variadic: true,
    },
    BuiltinProcInfo {
        id: BuiltinProcId::Write,
        canonical: "WRITE",
        variadic: true,
    },
];

/// Return the full metadata entry for a built-in.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a registry bug, covered by the guardrail tests).
pub fn info_for(id: BuiltinProcId) -> &'static BuiltinProcInfo {
    BUILTIN_PROCEDURES
        .iter()
        .find(|b| b.id == id)
        .expect("INVARIANT: every BuiltinProcId has a registry entry")
}

/// Return the canonical spelling of a built-in.
pub fn as_str(id: BuiltinProcId) -> &'static str {
    info_for(id).canonical
}

/// Lookup by (upper-case) name.
pub fn from_str(name: &str) -> Option<BuiltinProcId> {
    BUILTIN_PROCEDURES.iter().find(|b| b.canonical == name).map(|b| b.id)
}

/// True if `name` is one of the variadic I/O built-ins.
pub fn is_variadic(name: &str) -> bool {
    from_str(name).is_some_and(|id| info_for(id).variadic)
}
