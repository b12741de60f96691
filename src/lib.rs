#![forbid(unsafe_code)]
//! Vascal Translator
//!
//! A single-pass translator for Vascal, a small Pascal-like language. A table-driven LL(1) parser runs
//! syntax-directed semantic actions as productions are recognized; the actions maintain scoped symbol tables and
//! emit three-address quadruples with backpatched jump targets.
//!
//! This crate provides the semantic engine, the compilation driver and the CLI. The token source, grammar tables and
//! parser core live in `vascal_syntax`; the shared vocabulary lives in `vascal_core`.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Recoverable errors**: Semantic and most syntax errors are reported to a `Reporter` and compilation continues.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a translator bug (logic error), use `.expect("INVARIANT: reason")`
//!   with a clear explanation.

pub mod cli;
pub mod compile;
pub mod config;
pub mod semantics;

pub use compile::{Compilation, compile, compile_with_options, compile_with_reporter};
pub use config::CompileOptions;
pub use semantics::Engine;
pub use semantics::quads::{BackpatchList, QuadStore, Quadruple};
pub use semantics::symbols::{DataType, Entry, EntryId, SymbolTable};
pub use vascal_syntax::{Diagnostic, ParseError};
