//! Compilation driver: token source, parser and semantic engine wired together.
//!
//! ## Notes
//! - Every call builds a fresh lexer, reporter and engine. Nothing is shared between compilations.
//! - Recoverable diagnostics come back in [`Compilation::diagnostics`]; only a fatal [`ParseError`] is an `Err`.
//!
//! ## Examples
//! ```rust
//! let compilation = vascal::compile("PROGRAM t(input, output);\nVAR a: INTEGER;\nBEGIN a := 5 END.").unwrap();
//! assert!(compilation.is_clean());
//! assert!(compilation.code.starts_with("CODE\n1: call, main, 0\n"));
//! ```

use vascal_syntax::lexer::Lexer;
use vascal_syntax::{Diagnostic, ParseError, Parser, Reporter};

use crate::config::CompileOptions;
use crate::semantics::Engine;
use crate::semantics::quads::QuadStore;

/// Result of a compilation that ran to the end of the program.
#[derive(Debug)]
pub struct Compilation {
    /// Rendered quadruple listing.
    pub code: String,
    pub quadruples: QuadStore,
    /// Recoverable diagnostics, in the order they were reported.
    pub diagnostics: Vec<Diagnostic>,
    /// Global symbol table rendering, when requested.
    pub symbols: Option<String>,
}

impl Compilation {
    /// True when nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Compile `source` with default options.
///
/// ## Errors
/// See [`compile_with_options`].
pub fn compile(source: &str) -> Result<Compilation, ParseError> {
    compile_with_options(source, &CompileOptions::default())
}

/// Compile `source`.
///
/// ## Errors
/// - [`ParseError::Lexical`] on the first lexical error
/// - [`ParseError::ParserQuit`] when error recovery gives up
/// - [`ParseError::UnknownSymbolType`] on a grammar/action table defect
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn compile_with_options(source: &str, options: &CompileOptions) -> Result<Compilation, ParseError> {
    let mut reporter = Reporter::new();
    compile_with_reporter(source, options, &mut reporter)
}

/// Compile `source` into a caller-owned reporter.
///
/// Diagnostics reported before a fatal error stay in `reporter`, so a driver can print them ahead of the error.
///
/// ## Errors
/// See [`compile_with_options`].
pub fn compile_with_reporter(
    source: &str,
    options: &CompileOptions,
    reporter: &mut Reporter,
) -> Result<Compilation, ParseError> {
    let mut engine = Engine::new(options.clone());
    Parser::new(Lexer::new(source), &mut engine, reporter).parse()?;

    let code = engine.render();
    let symbols = options
        .dump_symbols
        .then(|| engine.symbols().render_scope(engine.symbols().global_scope()));
    let (quadruples, _) = engine.into_parts();
    let diagnostics = reporter.diagnostics().to_vec();
    tracing::debug!(quads = quadruples.len(), diagnostics = diagnostics.len(), "compiled");

    Ok(Compilation {
        code,
        quadruples,
        diagnostics,
        symbols,
    })
}
