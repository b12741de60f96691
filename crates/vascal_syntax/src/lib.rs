//! Syntax frontend for the Vascal language: token source, grammar tables, LL(1) parser core, diagnostics.
//!
//! The parser is a table-driven predictive parser. It owns the grammar-symbol stack and error recovery, and hands
//! every semantic-action symbol it pops to a [`parser::SemanticActions`] implementation together with the most
//! recently matched token.
//!
//! ## Notes
//! - This crate is "syntax-only": it knows nothing about symbol tables or generated code.
//! - Vocabulary identity (keywords/operators) comes from `vascal_core::lang` registries.
//! - The parse table is derived once per process from the compiled-in grammar (see [`grammar::table`]).
//!
//! ## Examples
//! ```rust
//! use vascal_syntax::lexer;
//! use vascal_syntax::token::TokenKind;
//!
//! let tokens = lexer::lex("BEGIN x := 1 END.").unwrap();
//! assert_eq!(tokens[0].kind(), TokenKind::Begin);
//! assert_eq!(tokens.last().map(|t| t.kind()), Some(TokenKind::EndOfFile));
//! ```

pub mod diagnostics;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;

pub use diagnostics::{Diagnostic, ParseError, Reporter};
pub use parser::{Parser, SemanticActions, TokenSource, UnknownAction};
pub use token::{Token, TokenKind};
