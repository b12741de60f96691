//! Provide the canonical language vocabulary for the Vascal translator.
//!
//! This crate is intentionally small and dependency-free. It holds the registries that both the syntax frontend and
//! the semantic engine consult, so spellings and opcodes live in exactly one place.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global mutable state, and no compiler-specific types.
//! - Current scope: reserved words, operators (with their intermediate-code opcodes), built-in subroutines, and the
//!   diagnostic code catalog.

pub mod lang;

pub use lang::errors::DiagnosticCode;
