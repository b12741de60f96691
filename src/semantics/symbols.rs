//! Symbol table and scope management for Vascal.
//!
//! Entries live in one arena and are addressed by [`EntryId`]; scopes map names to ids. At most two name scopes are
//! active: the global scope (always) and a local scope while a procedure or function body is compiled. Constants
//! have their own scope keyed by literal text.
//!
//! ## Notes
//! - Insertion is idempotent: inserting a name that already exists in the target scope leaves the first entry in
//!   place and returns its id. Callers detect duplicates with an explicit lookup first so they can report them.
//! - A negative address marks a temporary; see [`Entry::slot`].

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use vascal_core::lang::builtins::{self, BuiltinProcId};
use vascal_syntax::TokenKind;

/// Unique identifier for entries.
pub type EntryId = usize;

/// Declared type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Real,
}

impl DataType {
    /// Type named by a type keyword or carried by a constant kind.
    pub fn from_token_kind(kind: TokenKind) -> Option<DataType> {
        match kind {
            TokenKind::Integer | TokenKind::IntConstant => Some(DataType::Integer),
            TokenKind::Real | TokenKind::RealConstant => Some(DataType::Real),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Real => "REAL",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-entry flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFlags {
    pub global: bool,
    pub parameter: bool,
    pub reserved: bool,
    /// Inserted by error recovery in place of a missing or unusable entry.
    pub error: bool,
    pub function_result: bool,
}

/// Formal parameter descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamInfo {
    pub ty: DataType,
    pub is_array: bool,
    pub bounds: Option<(i64, i64)>,
}

/// Signature of a procedure or function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subroutine {
    pub params: Vec<ParamInfo>,
    pub declared_count: usize,
}

/// Kind-specific payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Variable,
    Array { lower: i64, upper: i64 },
    Constant,
    Procedure(Subroutine),
    Function { signature: Subroutine, result: EntryId },
}

/// A symbol table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub ty: Option<DataType>,
    pub address: i64,
    pub flags: EntryFlags,
}

impl Entry {
    pub fn variable(name: impl Into<String>, ty: DataType, address: i64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Variable,
            ty: Some(ty),
            address,
            flags: EntryFlags::default(),
        }
    }

    pub fn array(name: impl Into<String>, ty: DataType, lower: i64, upper: i64, address: i64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Array { lower, upper },
            ty: Some(ty),
            address,
            flags: EntryFlags::default(),
        }
    }

    pub fn constant(text: impl Into<String>, ty: DataType) -> Self {
        Self {
            name: text.into(),
            kind: EntryKind::Constant,
            ty: Some(ty),
            address: 0,
            flags: EntryFlags::default(),
        }
    }

    pub fn procedure(name: impl Into<String>, declared_count: usize) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Procedure(Subroutine {
                params: Vec::new(),
                declared_count,
            }),
            ty: None,
            address: 0,
            flags: EntryFlags {
                global: true,
                ..EntryFlags::default()
            },
        }
    }

    pub fn function(name: impl Into<String>, result: EntryId) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Function {
                signature: Subroutine::default(),
                result,
            },
            ty: None,
            address: 0,
            flags: EntryFlags {
                global: true,
                ..EntryFlags::default()
            },
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, EntryKind::Variable)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, EntryKind::Array { .. })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, EntryKind::Constant)
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self.kind, EntryKind::Procedure(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, EntryKind::Function { .. })
    }

    /// True for procedures and functions.
    pub fn is_subroutine(&self) -> bool {
        self.signature().is_some()
    }

    pub fn is_temporary(&self) -> bool {
        self.address < 0
    }

    /// Memory offset within the owning scope. Temporaries store `-(offset + 1)`.
    pub fn slot(&self) -> i64 {
        if self.address < 0 { -(self.address + 1) } else { self.address }
    }

    /// `(lower, upper)` for arrays.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        match self.kind {
            EntryKind::Array { lower, upper } => Some((lower, upper)),
            _ => None,
        }
    }

    /// Number of memory cells the entry occupies.
    pub fn size(&self) -> i64 {
        match self.kind {
            EntryKind::Array { lower, upper } => upper.saturating_sub(lower).saturating_add(1),
            EntryKind::Variable => 1,
            _ => 0,
        }
    }

    pub fn signature(&self) -> Option<&Subroutine> {
        match &self.kind {
            EntryKind::Procedure(signature) | EntryKind::Function { signature, .. } => Some(signature),
            _ => None,
        }
    }

    pub fn signature_mut(&mut self) -> Option<&mut Subroutine> {
        match &mut self.kind {
            EntryKind::Procedure(signature) | EntryKind::Function { signature, .. } => Some(signature),
            _ => None,
        }
    }

    /// Result variable of a function.
    pub fn result(&self) -> Option<EntryId> {
        match self.kind {
            EntryKind::Function { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Descriptor used when this entry is passed as an argument or declared as a parameter.
    pub fn param_info(&self) -> Option<ParamInfo> {
        Some(ParamInfo {
            ty: self.ty?,
            is_array: self.is_array(),
            bounds: self.bounds(),
        })
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            EntryKind::Variable => "Variable",
            EntryKind::Array { .. } => "Array",
            EntryKind::Constant => "Constant",
            EntryKind::Procedure(_) => "Procedure",
            EntryKind::Function { .. } => "Function",
        }
    }
}

/// An insertion-ordered name scope.
#[derive(Debug, Default)]
pub struct Scope {
    names: HashMap<String, EntryId>,
    order: Vec<EntryId>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<EntryId> {
        self.names.get(name).copied()
    }

    /// Entry ids in insertion order.
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Symbol table owning every entry of one compilation.
#[derive(Debug)]
pub struct SymbolTable {
    entries: Vec<Entry>,
    global: Scope,
    local: Option<Scope>,
    constants: Scope,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table with the reserved built-ins pre-declared.
    pub fn new() -> Self {
        let mut table = Self {
            entries: Vec::new(),
            global: Scope::default(),
            local: None,
            constants: Scope::default(),
        };
        table.add_builtins();
        table
    }

    fn add_builtins(&mut self) {
        for info in builtins::BUILTIN_PROCEDURES {
            let declared_count = if info.id == BuiltinProcId::Main { 0 } else { usize::MAX };
            let mut entry = Entry::procedure(info.canonical, declared_count);
            entry.flags.reserved = true;
            self.insert_global(entry);
        }
    }

    fn push(&mut self, entry: Entry) -> EntryId {
        let id = self.entries.len();
        self.entries.push(entry);
        id
    }

    fn insert_into(&mut self, target: ScopeTarget, entry: Entry) -> EntryId {
        let scope = match target {
            ScopeTarget::Active => self.local.as_ref().unwrap_or(&self.global),
            ScopeTarget::Global => &self.global,
            ScopeTarget::Constants => &self.constants,
        };
        if let Some(existing) = scope.get(&entry.name) {
            return existing;
        }
        let name = entry.name.clone();
        let id = self.push(entry);
        let scope = match target {
            ScopeTarget::Active => self.local.as_mut().unwrap_or(&mut self.global),
            ScopeTarget::Global => &mut self.global,
            ScopeTarget::Constants => &mut self.constants,
        };
        scope.names.insert(name, id);
        scope.order.push(id);
        id
    }

    /// Insert into the active scope (local if present, else global).
    pub fn insert(&mut self, entry: Entry) -> EntryId {
        self.insert_into(ScopeTarget::Active, entry)
    }

    /// Insert into the global scope regardless of the active scope.
    pub fn insert_global(&mut self, entry: Entry) -> EntryId {
        self.insert_into(ScopeTarget::Global, entry)
    }

    /// Store an entry that no scope can name (error placeholders, shadowed subroutines).
    pub fn insert_detached(&mut self, entry: Entry) -> EntryId {
        self.push(entry)
    }

    /// Find `name`, checking the local scope first when one is active.
    pub fn lookup(&self, name: &str) -> Option<EntryId> {
        self.local
            .as_ref()
            .and_then(|scope| scope.get(name))
            .or_else(|| self.global.get(name))
    }

    /// Find `name` in the active scope only.
    pub fn lookup_active(&self, name: &str) -> Option<EntryId> {
        self.local.as_ref().unwrap_or(&self.global).get(name)
    }

    pub fn lookup_global(&self, name: &str) -> Option<EntryId> {
        self.global.get(name)
    }

    /// Find or create the constant entry for a literal.
    pub fn constant(&mut self, text: &str, ty: DataType) -> EntryId {
        match self.constants.get(text) {
            Some(id) => id,
            None => self.insert_into(ScopeTarget::Constants, Entry::constant(text, ty)),
        }
    }

    pub fn enter_local_scope(&mut self) {
        self.local = Some(Scope::default());
    }

    pub fn exit_local_scope(&mut self) {
        self.local = None;
    }

    pub fn in_local_scope(&self) -> bool {
        self.local.is_some()
    }

    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id]
    }

    pub fn entry_mut(&mut self, id: EntryId) -> &mut Entry {
        &mut self.entries[id]
    }

    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    pub fn local_scope(&self) -> Option<&Scope> {
        self.local.as_ref()
    }

    pub fn constant_scope(&self) -> &Scope {
        &self.constants
    }

    /// Render the entries of `scope`, one block per entry.
    pub fn render_scope(&self, scope: &Scope) -> String {
        let mut out = String::new();
        for &id in scope.ids() {
            let entry = self.entry(id);
            let _ = writeln!(out, "{} Entry:", entry.kind_name());
            let _ = writeln!(out, "   Name    : {}", entry.name);
            if let Some(ty) = entry.ty {
                let _ = writeln!(out, "   Type    : {ty}");
            }
            match &entry.kind {
                EntryKind::Variable | EntryKind::Array { .. } => {
                    let _ = writeln!(out, "   Address : {}", entry.slot());
                    if let Some((lower, upper)) = entry.bounds() {
                        let _ = writeln!(out, "   Bounds  : {lower}..{upper}");
                    }
                }
                EntryKind::Procedure(signature) | EntryKind::Function { signature, .. } => {
                    if signature.declared_count != usize::MAX {
                        let _ = writeln!(out, "   Params  : {}", signature.declared_count);
                    }
                    if let Some(result) = entry.result() {
                        let _ = writeln!(out, "   Result  : {}", self.entry(result).name);
                    }
                }
                EntryKind::Constant => {}
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Clone, Copy)]
enum ScopeTarget {
    Active,
    Global,
    Constants,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_reserved_procedures() {
        let table = SymbolTable::new();
        for name in ["MAIN", "READ", "WRITE"] {
            let id = table.lookup(name).unwrap();
            let entry = table.entry(id);
            assert!(entry.is_procedure(), "{name}");
            assert!(entry.flags.reserved, "{name}");
        }
        assert_eq!(table.entry(table.lookup("MAIN").unwrap()).signature().unwrap().declared_count, 0);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut table = SymbolTable::new();
        let first = table.insert(Entry::variable("A", DataType::Integer, 0));
        let second = table.insert(Entry::variable("A", DataType::Real, 1));
        assert_eq!(first, second);
        assert_eq!(table.entry(first).ty, Some(DataType::Integer));
        assert_eq!(table.global_scope().len(), 4);
    }

    #[test]
    fn test_local_scope_shadows_and_is_discarded() {
        let mut table = SymbolTable::new();
        let global = table.insert(Entry::variable("X", DataType::Integer, 0));
        table.enter_local_scope();
        assert_eq!(table.lookup("X"), Some(global));
        assert_eq!(table.lookup_active("X"), None);

        let local = table.insert(Entry::variable("X", DataType::Real, 0));
        assert_ne!(local, global);
        assert_eq!(table.lookup("X"), Some(local));

        table.exit_local_scope();
        assert_eq!(table.lookup("X"), Some(global));
        assert!(!table.in_local_scope());
    }

    #[test]
    fn test_constants_are_shared() {
        let mut table = SymbolTable::new();
        let a = table.constant("5", DataType::Integer);
        let b = table.constant("5", DataType::Integer);
        assert_eq!(a, b);
        assert!(table.entry(a).is_constant());
        assert_eq!(table.lookup("5"), None);
    }

    #[test]
    fn test_array_size_and_temporary_slots() {
        let arr = Entry::array("A", DataType::Integer, 1, 5, 3);
        assert_eq!(arr.size(), 5);
        assert_eq!(arr.bounds(), Some((1, 5)));

        let temp = Entry::variable("$$t0", DataType::Integer, -8);
        assert!(temp.is_temporary());
        assert_eq!(temp.slot(), 7);
    }

    #[test]
    fn test_render_scope() {
        let mut table = SymbolTable::new();
        table.insert(Entry::array("V", DataType::Real, 2, 4, 0));
        let out = table.render_scope(table.global_scope());
        assert!(out.starts_with("Procedure Entry:\n   Name    : MAIN\n   Params  : 0\n"));
        assert!(out.contains("Array Entry:\n   Name    : V\n   Type    : REAL\n   Address : 0\n   Bounds  : 2..4\n"));
    }
}
