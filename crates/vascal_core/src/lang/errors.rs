//! Diagnostic code catalog.
//!
//! Every error the translator can report has a stable upper-snake-case code. Lexical and parse codes come from the
//! syntax frontend; semantic codes come from the action engine.
//!
//! ## Examples
//! ```rust
//! use vascal_core::lang::errors::{self, DiagnosticCode, Stage};
//!
//! assert_eq!(errors::as_str(DiagnosticCode::ParameterMiscount), "PARAMETER_MISCOUNT");
//! assert_eq!(errors::info_for(DiagnosticCode::ParserQuit).stage, Stage::Parse);
//! ```

use std::fmt;

/// Which translator stage reports a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lexical,
    Parse,
    Semantic,
}

/// Stable identifier for every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Lexical
    BadComment,
    UnmatchedComment,
    UnterminatedComment,
    IllegalCharacter,
    IdentifierTooLong,
    BadConstant,
    IllegalFloat,
    IllegalExponent,
    IllegalDecimal,

    // Parse
    UnmatchedTerminals,
    ErrorProduction,
    UnknownSymbolType,
    ParserQuit,

    // Semantic: declarations
    MultiplyDeclaredVariable,
    ReservedName,
    // Semantic: references and shapes
    UndeclaredVariable,
    ArrayWithoutSubscripts,
    VariableWithSubscripts,
    IntegerExpected,
    ModError,
    // Semantic: expression types
    ETypeErrorA,
    ETypeErrorR,
    // Semantic: calls
    ParameterMiscount,
    UnmatchedParameterTypes,
    ArrayParameterError,
    WrongFunction,
    NonProcedure,
    NonFunction,
}

/// Metadata for a diagnostic code.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticInfo {
    pub code: DiagnosticCode,
    pub name: &'static str,
    pub stage: Stage,
}

/// Registry of all diagnostic codes.
pub const DIAGNOSTICS: &[DiagnosticInfo] = &[
    // Lexical
    info(DiagnosticCode::BadComment, "BAD_COMMENT", Stage::Lexical),
    info(DiagnosticCode::UnmatchedComment, "UNMATCHED_COMMENT", Stage::Lexical),
    info(DiagnosticCode::UnterminatedComment, "UNTERMINATED_COMMENT", Stage::Lexical),
    info(DiagnosticCode::IllegalCharacter, "ILLEGAL_CHARACTER", Stage::Lexical),
    info(DiagnosticCode::IdentifierTooLong, "IDENTIFIER_TOO_LONG", Stage::Lexical),
    info(DiagnosticCode::BadConstant, "BAD_CONSTANT", Stage::Lexical),
    info(DiagnosticCode::IllegalFloat, "ILLEGAL_FLOAT", Stage::Lexical),
    info(DiagnosticCode::IllegalExponent, "ILLEGAL_EXPONENT", Stage::Lexical),
    info(DiagnosticCode::IllegalDecimal, "ILLEGAL_DECIMAL", Stage::Lexical),
    // Parse
    info(DiagnosticCode::UnmatchedTerminals, "UNMATCHED_TERMINALS", Stage::Parse),
    info(DiagnosticCode::ErrorProduction, "ERROR_PRODUCTION", Stage::Parse),
    info(DiagnosticCode::UnknownSymbolType, "UNKNOWN_SYMBOL_TYPE", Stage::Parse),
    info(DiagnosticCode::ParserQuit, "PARSER_QUIT", Stage::Parse),
    // Semantic
    info(DiagnosticCode::MultiplyDeclaredVariable, "MULTIPLY_DECLARED_VARIABLE", Stage::Semantic),
    info(DiagnosticCode::ReservedName, "RESERVED_NAME", Stage::Semantic),
    info(DiagnosticCode::UndeclaredVariable, "UNDECLARED_VARIABLE", Stage::Semantic),
    info(DiagnosticCode::ArrayWithoutSubscripts, "ARRAY_WITHOUT_SUBSCRIPTS", Stage::Semantic),
    info(DiagnosticCode::VariableWithSubscripts, "VARIABLE_WITH_SUBSCRIPTS", Stage::Semantic),
    info(DiagnosticCode::IntegerExpected, "INTEGER_EXPECTED", Stage::Semantic),
    info(DiagnosticCode::ModError, "MOD_ERROR", Stage::Semantic),
    info(DiagnosticCode::ETypeErrorA, "ETYPE_ERROR_A", Stage::Semantic),
    info(DiagnosticCode::ETypeErrorR, "ETYPE_ERROR_R", Stage::Semantic),
    info(DiagnosticCode::ParameterMiscount, "PARAMETER_MISCOUNT", Stage::Semantic),
    info(DiagnosticCode::UnmatchedParameterTypes, "UNMATCHED_PARAMETER_TYPES", Stage::Semantic),
    info(DiagnosticCode::ArrayParameterError, "ARRAY_PARAMETER_ERROR", Stage::Semantic),
    info(DiagnosticCode::WrongFunction, "WRONG_FUNCTION", Stage::Semantic),
    info(DiagnosticCode::NonProcedure, "NON_PROCEDURE", Stage::Semantic),
    info(DiagnosticCode::NonFunction, "NON_FUNCTION", Stage::Semantic),
];

/// Return the full metadata entry for a code.
///
/// ## Panics
/// - If the registry is missing an entry for `code` (a registry bug, covered by the guardrail tests).
pub fn info_for(code: DiagnosticCode) -> &'static DiagnosticInfo {
    DIAGNOSTICS
        .iter()
        .find(|d| d.code == code)
        .expect("INVARIANT: every DiagnosticCode has a registry entry")
}

/// Return the stable name of a code.
pub fn as_str(code: DiagnosticCode) -> &'static str {
    info_for(code).name
}

/// Lookup by stable name.
pub fn from_str(name: &str) -> Option<DiagnosticCode> {
    DIAGNOSTICS.iter().find(|d| d.name == name).map(|d| d.code)
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

// --- helpers -----------------------------------------------------------------

const fn info(code: DiagnosticCode, name: &'static str, stage: Stage) -> DiagnosticInfo {
    DiagnosticInfo { code, name, stage }
}
