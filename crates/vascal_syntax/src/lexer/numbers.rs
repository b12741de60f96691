//! Numeric literal scanning.
//!
//! ```text
//! digits                      -> INTCONSTANT
//! digits '.' digits [exp]     -> REALCONSTANT
//! digits exp                  -> REALCONSTANT
//! exp = ('E' | 'e') ['+' | '-'] digits
//! ```
//!
//! `1..5` is an INTCONSTANT followed by DOUBLEDOT: a `.` is only taken as a decimal point when the next character is
//! not another `.`. Exponent markers are normalized to upper-case `E` in the token text.

use vascal_core::DiagnosticCode;

use super::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer<'_> {
    pub(super) fn number(&mut self, first: char) -> Token {
        let mut text = String::from(first);
        self.digits(&mut text);

        let mut real = false;
        if self.peek() == Some('.') && self.peek_next() != Some('.') {
            self.advance();
            text.push('.');
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return self.error(DiagnosticCode::IllegalFloat, "There is no digit after the decimal point");
            }
            self.digits(&mut text);
            real = true;
            if self.peek() == Some('.') && self.peek_next() != Some('.') {
                return self.error(DiagnosticCode::IllegalFloat, "There are two decimal points in a number");
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            text.push('E');
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.advance();
                text.push(sign);
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return self.error(DiagnosticCode::IllegalExponent, "An integer must follow an exponent declaration");
            }
            self.digits(&mut text);
            if self.peek() == Some('.') && self.peek_next() != Some('.') {
                return self.error(
                    DiagnosticCode::IllegalExponent,
                    "Only integers are allowed to be exponents (Can't have a '.' after an E in a number)",
                );
            }
            real = true;
        }

        if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return self.error(DiagnosticCode::BadConstant, "Cannot have a (non-E) letter in a constant");
        }

        let kind = if real { TokenKind::RealConstant } else { TokenKind::IntConstant };
        Token::constant(kind, text)
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek().filter(|c| c.is_ascii_digit()) {
            self.advance();
            text.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::lex;
    use crate::token::{Token, TokenKind};
    use vascal_core::DiagnosticCode;

    fn single(source: &str) -> Token {
        lex(source).unwrap().remove(0)
    }

    #[test]
    fn test_integer_and_real_constants() {
        assert_eq!(single("42"), Token::constant(TokenKind::IntConstant, "42"));
        assert_eq!(single("3.25"), Token::constant(TokenKind::RealConstant, "3.25"));
        assert_eq!(single("1.5e-3"), Token::constant(TokenKind::RealConstant, "1.5E-3"));
        assert_eq!(single("7E2"), Token::constant(TokenKind::RealConstant, "7E2"));
    }

    #[test]
    fn test_range_is_not_a_real() {
        let kinds: Vec<_> = lex("1..10").unwrap().iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IntConstant,
                TokenKind::DoubleDot,
                TokenKind::IntConstant,
                TokenKind::EndOfFile
            ]
        );
    }

    #[test]
    fn test_malformed_constants() {
        let code = |s: &str| lex(s).unwrap_err()[0].code;
        assert_eq!(code("12abc"), DiagnosticCode::BadConstant);
        assert_eq!(code("1.x"), DiagnosticCode::IllegalFloat);
        assert_eq!(code("1.2.3"), DiagnosticCode::IllegalFloat);
        assert_eq!(code("1E+"), DiagnosticCode::IllegalExponent);
        assert_eq!(code("1E2.5"), DiagnosticCode::IllegalExponent);
    }
}
