//! Define the reserved word vocabulary for the Vascal language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** against the upper-case canonical spelling. The lexer normalizes
//!   identifiers to upper case before asking.
//! - Some reserved words are "word operators" (`OR`, `DIV`, `MOD`, `AND`). They are listed here so they can never be
//!   declared as identifiers; use [`crate::lang::operators`] for their operator semantics.
//!
//! ## Examples
//! ```rust
//! use vascal_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("ARRAY"), Some(KeywordId::Array));
//! assert_eq!(keywords::category(KeywordId::Mod), KeywordCategory::Operator);
//! ```

/// Stable identifier for every reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Program structure
    Program,
    Begin,
    End,
    Var,
    Function,
    Procedure,
    Result,

    // Types
    Integer,
    Real,
    Array,
    Of,

    // Statements
    If,
    Then,
    Else,
    While,
    Do,

    // Word operators
    Not,
    Or,
    Div,
    Mod,
    And,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; they do not enforce parsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Structure,
    Type,
    Statement,
    Operator,
}

/// Metadata for a reserved word.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all reserved words.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Program structure
    info(KeywordId::Program, "PROGRAM", KeywordCategory::Structure),
    info(KeywordId::Begin, "BEGIN", KeywordCategory::Structure),
    info(KeywordId::End, "END", KeywordCategory::Structure),
    info(KeywordId::Var, "VAR", KeywordCategory::Structure),
    info(KeywordId::Function, "FUNCTION", KeywordCategory::Structure),
    info(KeywordId::Procedure, "PROCEDURE", KeywordCategory::Structure),
    info(KeywordId::Result, "RESULT", KeywordCategory::Structure),
    // Types
    info(KeywordId::Integer, "INTEGER", KeywordCategory::Type),
    info(KeywordId::Real, "REAL", KeywordCategory::Type),
    info(KeywordId::Array, "ARRAY", KeywordCategory::Type),
    info(KeywordId::Of, "OF", KeywordCategory::Type),
    // Statements
    info(KeywordId::If, "IF", KeywordCategory::Statement),
    info(KeywordId::Then, "THEN", KeywordCategory::Statement),
    info(KeywordId::Else, "ELSE", KeywordCategory::Statement),
    info(KeywordId::While, "WHILE", KeywordCategory::Statement),
    info(KeywordId::Do, "DO", KeywordCategory::Statement),
    // Word operators
    info(KeywordId::Not, "NOT", KeywordCategory::Operator),
    info(KeywordId::Or, "OR", KeywordCategory::Operator),
    info(KeywordId::Div, "DIV", KeywordCategory::Operator),
    info(KeywordId::Mod, "MOD", KeywordCategory::Operator),
    info(KeywordId::And, "AND", KeywordCategory::Operator),
];

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return the category of a keyword.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return the full metadata entry for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (a registry bug, covered by the guardrail tests).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

/// Lookup by (upper-case) spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}
