//! Diagnostics and error reporting for Vascal.
//!
//! Two channels, kept apart:
//! - [`Diagnostic`] values are *recoverable* errors. They are pushed into a [`Reporter`] side channel and compilation
//!   continues.
//! - [`ParseError`] is *fatal*. It propagates out of [`crate::Parser::parse`] and ends the run.

use std::fmt;

use thiserror::Error;
use vascal_core::DiagnosticCode;

/// A recoverable error with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub line: usize,
    pub source_line: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, line: usize, source_line: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            line,
            source_line: source_line.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ">>> ERROR AT LINE {}: {}\n>>> {}",
            self.line, self.source_line, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Collect diagnostics in the order they occur.
///
/// ## Notes
/// - The parser keeps the location current (`set_location`) before every step that can report, so semantic actions
///   only need to supply a code and a message.
#[derive(Debug, Default)]
pub struct Reporter {
    line: usize,
    source_line: String,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the location attached to subsequent reports.
    pub fn set_location(&mut self, line: usize, source_line: &str) {
        self.line = line;
        if self.source_line != source_line {
            self.source_line.clear();
            self.source_line.push_str(source_line);
        }
    }

    /// Record a diagnostic at the current location.
    pub fn report(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(code, self.line, self.source_line.clone(), message);
        tracing::debug!(code = %diagnostic.code, line = diagnostic.line, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics reported with `code`.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }
}

/// Fatal conditions that terminate a parse.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ParseError {
    /// The token source produced an ERROR token.
    #[error("{0}")]
    #[diagnostic(code(vascal::lex::error))]
    Lexical(Box<Diagnostic>),

    /// The grammar referenced a symbol nobody can process (a grammar/action table defect).
    #[error(">>> ERROR AT LINE {line}: {source_line}\n>>> {symbol} is not a terminal, nonterminal, nor a semantic action")]
    #[diagnostic(code(vascal::parse::unknown_symbol_type))]
    UnknownSymbolType {
        symbol: String,
        line: usize,
        source_line: String,
    },

    /// Error recovery gave up.
    #[error("Parse quit early due to error at line {line}")]
    #[diagnostic(code(vascal::parse::parser_quit), help("fix the first reported error and try again"))]
    ParserQuit { line: usize },
}

impl ParseError {
    /// Catalog code of this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ParseError::Lexical(diag) => diag.code,
            ParseError::UnknownSymbolType { .. } => DiagnosticCode::UnknownSymbolType,
            ParseError::ParserQuit { .. } => DiagnosticCode::ParserQuit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_renders_two_line_format() {
        let d = Diagnostic::new(
            DiagnosticCode::UndeclaredVariable,
            3,
            "  X := 1;",
            "Undeclared variable X",
        );
        assert_eq!(d.to_string(), ">>> ERROR AT LINE 3:   X := 1;\n>>> Undeclared variable X");
    }

    #[test]
    fn reporter_keeps_order_and_location() {
        let mut r = Reporter::new();
        r.set_location(1, "a");
        r.report(DiagnosticCode::ModError, "first");
        r.set_location(2, "b");
        r.report(DiagnosticCode::ModError, "second");
        r.report(DiagnosticCode::NonFunction, "third");

        let lines: Vec<_> = r.diagnostics().iter().map(|d| (d.line, d.message.as_str())).collect();
        assert_eq!(lines, vec![(1, "first"), (2, "second"), (2, "third")]);
        assert_eq!(r.count(DiagnosticCode::ModError), 2);
    }

    #[test]
    fn parse_error_codes() {
        assert_eq!(ParseError::ParserQuit { line: 1 }.code(), DiagnosticCode::ParserQuit);
    }
}
