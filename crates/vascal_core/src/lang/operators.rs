//! Operator vocabulary.
//!
//! This module defines the canonical operator set (symbol operators like `<=` and word operators like `DIV`) along
//! with the token class each one lexes to and the intermediate-code opcode it lowers to.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; word operators are upper-case.
//! - The opcode is the integer form. Real arithmetic and real comparisons use the same mnemonic with an `f` prefix
//!   (see [`real_opcode`]).
//! - `AND`/`OR` never reach code emission as instructions: they are lowered to short-circuit jumps. Their opcode is
//!   kept for diagnostics and table dumps only.
//!
//! ## Examples
//! ```rust
//! use vascal_core::lang::operators::{self, OperatorClass, OperatorId};
//!
//! assert_eq!(operators::from_str("<>"), Some(OperatorId::NotEq));
//! assert_eq!(operators::info_for(OperatorId::NotEq).opcode, "bne");
//! assert_eq!(operators::info_for(OperatorId::Div).class, OperatorClass::Multiplicative);
//! ```

/// Which operator token class an operator belongs to (RELOP, ADDOP or MULOP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Relational,
    Additive,
    Multiplicative,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Relational
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Additive
    Plus,
    Minus,
    Or,

    // Multiplicative
    Star,
    Slash,
    Div,
    Mod,
    And,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub class: OperatorClass,
    /// Integer-form intermediate opcode (`blt`, `add`, ...).
    pub opcode: &'static str,
    pub is_keyword_spelling: bool,
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Relational
    op(OperatorId::Eq, "=", OperatorClass::Relational, "beq", false),
    op(OperatorId::NotEq, "<>", OperatorClass::Relational, "bne", false),
    op(OperatorId::Lt, "<", OperatorClass::Relational, "blt", false),
    op(OperatorId::LtEq, "<=", OperatorClass::Relational, "ble", false),
    op(OperatorId::Gt, ">", OperatorClass::Relational, "bgt", false),
    op(OperatorId::GtEq, ">=", OperatorClass::Relational, "bge", false),
    // Additive
    op(OperatorId::Plus, "+", OperatorClass::Additive, "add", false),
    op(OperatorId::Minus, "-", OperatorClass::Additive, "sub", false),
    op(OperatorId::Or, "OR", OperatorClass::Additive, "or", true),
    // Multiplicative
    op(OperatorId::Star, "*", OperatorClass::Multiplicative, "mul", false),
    op(OperatorId::Slash, "/", OperatorClass::Multiplicative, "div", false),
    op(OperatorId::Div, "DIV", OperatorClass::Multiplicative, "div", true),
    op(OperatorId::Mod, "MOD", OperatorClass::Multiplicative, "mod", true),
    op(OperatorId::And, "AND", OperatorClass::Multiplicative, "and", true),
];

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a registry bug, covered by the guardrail tests).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS
        .iter()
        .find(|o| o.id == id)
        .expect("INVARIANT: every OperatorId has a registry entry")
}

/// Return the source spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Lookup by spelling.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Real-typed variant of an integer opcode (`add` -> `fadd`, `blt` -> `fblt`).
pub fn real_opcode(opcode: &str) -> String {
    format!("f{opcode}")
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    class: OperatorClass,
    opcode: &'static str,
    is_keyword_spelling: bool,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        class,
        opcode,
        is_keyword_spelling,
    }
}
