//! Lexer for the Vascal language.
//!
//! Handles tokenization including:
//! - Reserved words and upper-cased identifiers
//! - Integer and real constants (see `numbers`)
//! - Operators, with `+`/`-` classified as binary or unary from the previous token
//! - `{ ... }` comments, treated as blanks
//!
//! ## Notes
//! - The lexer is pull-based: the parser asks for one token at a time through [`TokenSource`]. [`lex`] drains a
//!   whole stream for debugging and tests.
//! - Lexical errors do not abort the lexer. They come back as [`Token::Error`] carrying a [`Diagnostic`]; the
//!   parser decides that such a token halts parsing.
//! - Once the input is exhausted every further call yields ENDOFFILE.

mod numbers;

use vascal_core::DiagnosticCode;
use vascal_core::lang::keywords;
use vascal_core::lang::operators::{self, OperatorId};

use crate::diagnostics::Diagnostic;
use crate::parser::TokenSource;
use crate::token::{Token, TokenKind};

/// Longest accepted identifier.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Pull-based lexer over a source string.
pub struct Lexer<'a> {
    source: &'a str,
    lines: Vec<&'a str>,
    pos: usize,
    /// Line of the scan position (1-based).
    line: usize,
    /// Line on which the most recent token started.
    token_line: usize,
    /// Kind of the previously produced token, for unary/binary `+`/`-`.
    previous: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: source.lines().collect(),
            pos: 0,
            line: 1,
            token_line: 1,
            previous: None,
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        let token = self.scan();
        self.previous = Some(token.kind());
        token
    }

    /// Line on which the most recently produced token started.
    pub fn line(&self) -> usize {
        self.token_line
    }

    /// Full text of [`Lexer::line`] (without the line terminator).
    pub fn line_text(&self) -> &'a str {
        self.lines.get(self.token_line.saturating_sub(1)).copied().unwrap_or("")
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, code: DiagnosticCode, message: impl Into<String>) -> Token {
        Token::Error(Box::new(Diagnostic::new(code, self.token_line, self.line_text(), message)))
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan(&mut self) -> Token {
        if let Some(err) = self.skip_blanks_and_comments() {
            return err;
        }
        self.token_line = self.line;

        let Some(c) = self.advance() else {
            return Token::Simple(TokenKind::EndOfFile);
        };

        match c {
            c if c.is_ascii_digit() => self.number(c),
            c if c.is_ascii_alphabetic() => self.word(c),
            '=' => Token::operator(OperatorId::Eq),
            '<' => match self.peek() {
                Some('>') => {
                    self.advance();
                    Token::operator(OperatorId::NotEq)
                }
                Some('=') => {
                    self.advance();
                    Token::operator(OperatorId::LtEq)
                }
                _ => Token::operator(OperatorId::Lt),
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::operator(OperatorId::GtEq)
                } else {
                    Token::operator(OperatorId::Gt)
                }
            }
            '+' | '-' => self.plus_minus(c),
            '*' => Token::operator(OperatorId::Star),
            '/' => Token::operator(OperatorId::Slash),
            ':' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::Simple(TokenKind::Assignop)
                } else {
                    Token::Simple(TokenKind::Colon)
                }
            }
            ',' => Token::Simple(TokenKind::Comma),
            ';' => Token::Simple(TokenKind::Semicolon),
            '(' => Token::Simple(TokenKind::LeftParen),
            ')' => Token::Simple(TokenKind::RightParen),
            '[' => Token::Simple(TokenKind::LeftBracket),
            ']' => Token::Simple(TokenKind::RightBracket),
            '.' => match self.peek() {
                Some('.') => {
                    self.advance();
                    Token::Simple(TokenKind::DoubleDot)
                }
                Some(n) if n.is_ascii_alphanumeric() => {
                    self.error(DiagnosticCode::IllegalDecimal, "A digit MUST precede a decimal in a constant")
                }
                _ => Token::Simple(TokenKind::EndMarker),
            },
            '}' => self.error(
                DiagnosticCode::UnmatchedComment,
                "Unmatched comment bracket. Cannot have a } before a corresponding {",
            ),
            other => self.error(DiagnosticCode::IllegalCharacter, format!("Illegal character: {other}")),
        }
    }

    /// Skip whitespace and `{ ... }` comments. Returns an error token for a malformed comment.
    fn skip_blanks_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('{') => {
                    self.token_line = self.line;
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('}') => break,
                            Some('{') => {
                                return Some(
                                    self.error(DiagnosticCode::BadComment, "Cannot include { inside a comment"),
                                );
                            }
                            Some(_) => {}
                            None => {
                                return Some(self.error(DiagnosticCode::UnterminatedComment, "Unterminated comment."));
                            }
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    // ========================================================================
    // Token recognizers
    // ========================================================================

    fn word(&mut self, first: char) -> Token {
        let start = self.pos - first.len_utf8();
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }
        let word = self.source[start..self.pos].to_ascii_uppercase();
        if word.len() > MAX_IDENTIFIER_LENGTH {
            return self.error(
                DiagnosticCode::IdentifierTooLong,
                format!("This identifier is too long. It exceeds {MAX_IDENTIFIER_LENGTH} characters"),
            );
        }

        if let Some(op) = operators::from_str(&word) {
            return Token::operator(op);
        }
        match keywords::from_str(&word) {
            Some(id) => Token::Simple(TokenKind::for_keyword(id)),
            None => Token::Identifier(word),
        }
    }

    fn plus_minus(&mut self, c: char) -> Token {
        let binary = matches!(
            self.previous,
            Some(
                TokenKind::RightParen
                    | TokenKind::RightBracket
                    | TokenKind::Identifier
                    | TokenKind::IntConstant
                    | TokenKind::RealConstant
            )
        );
        match (c, binary) {
            ('+', true) => Token::operator(OperatorId::Plus),
            ('-', true) => Token::operator(OperatorId::Minus),
            ('+', false) => Token::Simple(TokenKind::UnaryPlus),
            _ => Token::Simple(TokenKind::UnaryMinus),
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }

    fn current_line(&self) -> usize {
        self.line()
    }

    fn current_line_text(&self) -> &str {
        self.line_text()
    }
}

/// Tokenize a whole source string.
///
/// The returned stream always ends with ENDOFFILE.
///
/// ## Errors
/// Returns every lexical error found, in source order.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<Diagnostic>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    loop {
        match lexer.next_token() {
            Token::Error(diag) => errors.push(*diag),
            token => {
                let done = token.kind() == TokenKind::EndOfFile;
                tokens.push(token);
                if done {
                    break;
                }
            }
        }
    }
    if errors.is_empty() { Ok(tokens) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().iter().map(Token::kind).collect()
    }

    fn first_error(source: &str) -> DiagnosticCode {
        lex(source).unwrap_err()[0].code
    }

    #[test]
    fn test_keywords_and_identifiers_are_case_insensitive() {
        let tokens = lex("program Foo begin").unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::Program);
        assert_eq!(tokens[1], Token::Identifier("FOO".to_string()));
        assert_eq!(tokens[2].kind(), TokenKind::Begin);
    }

    #[test]
    fn test_word_operators() {
        let tokens = lex("a OR b and c div d mod e").unwrap();
        let ops: Vec<_> = tokens.iter().filter_map(Token::operator_id).collect();
        assert_eq!(ops, vec![OperatorId::Or, OperatorId::And, OperatorId::Div, OperatorId::Mod]);
        assert_eq!(tokens[1].kind(), TokenKind::Addop);
        assert_eq!(tokens[3].kind(), TokenKind::Mulop);
    }

    #[test]
    fn test_relational_operators_longest_match() {
        let tokens = lex("< <= <> > >= =").unwrap();
        let ops: Vec<_> = tokens.iter().filter_map(Token::operator_id).collect();
        assert_eq!(
            ops,
            vec![
                OperatorId::Lt,
                OperatorId::LtEq,
                OperatorId::NotEq,
                OperatorId::Gt,
                OperatorId::GtEq,
                OperatorId::Eq
            ]
        );
    }

    #[test]
    fn test_unary_vs_binary_minus() {
        assert_eq!(
            kinds("x := -1 - y"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assignop,
                TokenKind::UnaryMinus,
                TokenKind::IntConstant,
                TokenKind::Addop,
                TokenKind::Identifier,
                TokenKind::EndOfFile
            ]
        );
        assert_eq!(kinds("(+a)")[1], TokenKind::UnaryPlus);
        assert_eq!(kinds("a[1]+2")[4], TokenKind::Addop);
    }

    #[test]
    fn test_punctuation_and_endmarker() {
        assert_eq!(
            kinds("a : b := c ; [ ] ( ) , ."),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Assignop,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Comma,
                TokenKind::EndMarker,
                TokenKind::EndOfFile
            ]
        );
    }

    #[test]
    fn test_comments_are_blank_and_track_lines() {
        let mut lexer = Lexer::new("{ header\n comment }\nBEGIN");
        let tok = lexer.next_token();
        assert_eq!(tok.kind(), TokenKind::Begin);
        assert_eq!(lexer.line(), 3);
        assert_eq!(lexer.line_text(), "BEGIN");
    }

    #[test]
    fn test_comment_errors() {
        assert_eq!(first_error("{ a { b }"), DiagnosticCode::BadComment);
        assert_eq!(first_error("{ never closed"), DiagnosticCode::UnterminatedComment);
        assert_eq!(first_error("x }"), DiagnosticCode::UnmatchedComment);
    }

    #[test]
    fn test_illegal_character_and_decimal() {
        assert_eq!(first_error("a ? b"), DiagnosticCode::IllegalCharacter);
        assert_eq!(first_error(".5"), DiagnosticCode::IllegalDecimal);
    }

    #[test]
    fn test_identifier_too_long() {
        let long = "A".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_eq!(first_error(&long), DiagnosticCode::IdentifierTooLong);
        assert!(lex(&"B".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind(), TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind(), TokenKind::EndOfFile);
        assert_eq!(lexer.next_token().kind(), TokenKind::EndOfFile);
    }
}
