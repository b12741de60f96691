//! Error recovery.
//!
//! - Unmatched terminal: report, then act as if the expected terminal had been present. A missing ENDMARKER quits
//!   instead, since nothing meaningful can follow the end of the program.
//! - Error cell: report, then panic mode. Input is skipped to the next synchronizing token (`;`, END, ENDOFFILE),
//!   and the stack is popped to the next synchronizing terminal, which is pushed back.

use vascal_core::DiagnosticCode;

use super::{Parser, SemanticActions, TokenSource};
use crate::diagnostics::ParseError;
use crate::grammar::{GrammarSymbol, error_message};
use crate::token::TokenKind;

fn is_synchronizing(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Semicolon | TokenKind::End | TokenKind::EndOfFile)
}

impl<S: TokenSource, A: SemanticActions + ?Sized> Parser<'_, S, A> {
    pub(super) fn unmatched_terminal(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        self.sync_location();
        self.reporter.report(
            DiagnosticCode::UnmatchedTerminals,
            format!("Expected to find a {expected} but found a {}", self.current.kind()),
        );

        if expected == TokenKind::EndMarker {
            return Err(self.quit());
        }
        tracing::debug!(%expected, "recovery: terminal inserted");
        Ok(())
    }

    pub(super) fn error_production(&mut self, message_id: usize) -> Result<(), ParseError> {
        self.sync_location();
        self.reporter.report(
            DiagnosticCode::ErrorProduction,
            format!("{}\n>>> Got a {} instead", error_message(message_id), self.current.kind()),
        );
        self.actions.on_recovery();
        tracing::debug!("recovery: panic mode");

        while !is_synchronizing(self.current.kind()) {
            self.current = self.next()?;
        }

        let anchor = loop {
            match self.stack.pop() {
                Some(GrammarSymbol::Terminal(kind)) if is_synchronizing(kind) => break kind,
                Some(_) => {}
                None => return Err(self.quit()),
            }
        };
        self.stack.push(GrammarSymbol::Terminal(anchor));

        if anchor == TokenKind::EndOfFile || (anchor == TokenKind::End && self.current.kind() == TokenKind::Semicolon) {
            return Err(self.quit());
        }
        Ok(())
    }
}
