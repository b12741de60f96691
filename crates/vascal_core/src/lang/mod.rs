//! Vascal language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved words, operators, built-in subroutines,
//! and diagnostic codes.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via registry
//! tables instead of comparing strings at every call site.
//!
//! ## Notes
//! - Registries are **pure**: no token types, no IO, no side effects.
//! - Vascal is case-insensitive; the lexer upper-cases words before lookup, so registry spellings are upper-case.
//!
//! ## Examples
//! ```rust
//! use vascal_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("WHILE"), Some(KeywordId::While));
//! assert_eq!(keywords::as_str(KeywordId::While), "WHILE");
//! ```

pub mod builtins;
pub mod errors;
pub mod keywords;
pub mod operators;
