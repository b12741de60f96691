//! LL(1) predictive parser core.
//!
//! The parser owns an explicit stack of [`GrammarSymbol`]s seeded with `[ENDOFFILE, Goal]`. Each step pops one
//! symbol:
//! - a terminal is matched against the current token (or virtually inserted, see `recovery`)
//! - a nonterminal is expanded through the parse table, pushing the right-hand side reversed
//! - an action is handed to [`SemanticActions::execute`] together with the most recently matched token
//!
//! ## Notes
//! - The parser never looks at the semantic engine's state. The engine never touches the grammar-symbol stack.
//! - Recoverable problems go to the shared [`Reporter`]. Only [`ParseError`] ends a parse.

mod recovery;


use thiserror::Error;

use crate::diagnostics::{ParseError, Reporter};
use crate::grammar::{ActionId, Code, GrammarSymbol, NonTerminal, ParseTable, parse_table, rhs};
use crate::token::{Token, TokenKind};

/// Pull-based token stream consumed by the parser.
///
/// ## Notes
/// - Must yield ENDOFFILE once input is exhausted, and keep yielding it.
/// - Must not re-emit earlier tokens; the parser looks exactly one token ahead.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;

    /// Line of the most recently produced token (1-based).
    fn current_line(&self) -> usize;

    /// Full text of [`TokenSource::current_line`].
    fn current_line_text(&self) -> &str;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }

    fn current_line(&self) -> usize {
        (**self).current_line()
    }

    fn current_line_text(&self) -> &str {
        (**self).current_line_text()
    }
}

/// The action id has no implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown semantic action {0}")]
pub struct UnknownAction(pub ActionId);

/// Receiver of the semantic-action symbols the parser pops.
pub trait SemanticActions {
    /// Run action `action`. `token` is the most recently matched terminal.
    ///
    /// ## Errors
    /// [`UnknownAction`] when `action` is not implemented; the parser treats that as a fatal grammar defect.
    fn execute(&mut self, action: ActionId, token: &Token, reporter: &mut Reporter) -> Result<(), UnknownAction>;

    /// Called when panic mode is about to discard grammar symbols, and with them any pending actions.
    ///
    /// Virtual insertion of a missing terminal keeps the symbol stack intact and does not call this.
    fn on_recovery(&mut self) {}

    /// Called once after the symbol stack empties without a fatal error.
    fn finish(&mut self) {}
}

/// Table-driven predictive parser.
pub struct Parser<'a, S, A: ?Sized> {
    source: S,
    actions: &'a mut A,
    reporter: &'a mut Reporter,
    table: &'static ParseTable,
    stack: Vec<GrammarSymbol>,
    current: Token,
    previous: Token,
}

impl<'a, S: TokenSource, A: SemanticActions + ?Sized> Parser<'a, S, A> {
    /// Create a parser pulling tokens from `source`.
    ///
    /// ## Parameters
    /// - `actions`: receives every action symbol
    /// - `reporter`: shared with the actions; collects recoverable diagnostics in order
    pub fn new(source: S, actions: &'a mut A, reporter: &'a mut Reporter) -> Self {
        Self {
            source,
            actions,
            reporter,
            table: parse_table(),
            stack: Vec::new(),
            current: Token::Simple(TokenKind::EndOfFile),
            previous: Token::Simple(TokenKind::EndOfFile),
        }
    }

    /// Parse the whole token stream.
    ///
    /// ## Errors
    /// - [`ParseError::Lexical`] when the source yields an ERROR token
    /// - [`ParseError::ParserQuit`] when recovery gives up
    /// - [`ParseError::UnknownSymbolType`] when an action has no implementation
    #[tracing::instrument(skip_all)]
    pub fn parse(&mut self) -> Result<(), ParseError> {
        self.stack.clear();
        self.stack.push(GrammarSymbol::Terminal(TokenKind::EndOfFile));
        self.stack.push(GrammarSymbol::NonTerminal(NonTerminal::Goal));
        self.current = self.next()?;

        while let Some(predicted) = self.stack.pop() {
            tracing::trace!(%predicted, current = %self.current, depth = self.stack.len(), "parse step");
            match predicted {
                GrammarSymbol::Terminal(kind) if kind == self.current.kind() => {
                    let next = self.next()?;
                    self.previous = std::mem::replace(&mut self.current, next);
                }
                GrammarSymbol::Terminal(kind) => self.unmatched_terminal(kind)?,
                GrammarSymbol::NonTerminal(nt) => match self.table.lookup(self.current.kind(), nt) {
                    Code::Epsilon => {}
                    Code::Production(n) => self.stack.extend(rhs(n).iter().rev().copied()),
                    Code::Error(id) => self.error_production(id)?,
                },
                GrammarSymbol::Action(id) => {
                    self.sync_location();
                    if let Err(UnknownAction(id)) = self.actions.execute(id, &self.previous, self.reporter) {
                        return Err(ParseError::UnknownSymbolType {
                            symbol: id.to_string(),
                            line: self.source.current_line(),
                            source_line: self.source.current_line_text().to_string(),
                        });
                    }
                }
            }
        }

        self.actions.finish();
        Ok(())
    }

    /// Pull the next token, turning a lexical error into a fatal [`ParseError`].
    fn next(&mut self) -> Result<Token, ParseError> {
        let token = self.source.next_token();
        self.sync_location();
        match token {
            Token::Error(diagnostic) => Err(ParseError::Lexical(diagnostic)),
            token => Ok(token),
        }
    }

    fn sync_location(&mut self) {
        self.reporter
            .set_location(self.source.current_line(), self.source.current_line_text());
    }

    fn quit(&self) -> ParseError {
        ParseError::ParserQuit {
            line: self.source.current_line(),
        }
    }
}

/// Parse `source` with `actions`, collecting diagnostics into `reporter`.
///
/// ## Errors
/// See [`Parser::parse`].
pub fn parse<S: TokenSource, A: SemanticActions + ?Sized>(
    source: S,
    actions: &mut A,
    reporter: &mut Reporter,
) -> Result<(), ParseError> {
    Parser::new(source, actions, reporter).parse()
}
