//! Token types for the Vascal token source.
//!
//! A [`TokenKind`] is the terminal alphabet of the grammar; its dense index is the parse-table row. A [`Token`] is
//! what the lexer actually yields: a kind plus whatever textual payload the kind needs.
//!
//! ## Notes
//! - Identifiers are stored upper-cased.
//! - Operator tokens carry a registry [`OperatorId`]; their spelling and intermediate opcode come from
//!   `vascal_core::lang::operators`.
//! - Token equality and hashing use `(kind, text)` only.

use std::fmt;
use std::hash::{Hash, Hasher};

use vascal_core::lang::keywords::KeywordId;
use vascal_core::lang::operators::{self, OperatorClass, OperatorId};

use crate::diagnostics::Diagnostic;

// ============================================================================
// TOKEN KINDS
// ============================================================================

/// Terminal kinds, in parse-table row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // ========== Reserved words ==========
    Program,
    Begin,
    End,
    Var,
    Function,
    Procedure,
    Result,
    Integer,
    Real,
    Array,
    Of,
    If,
    Then,
    Else,
    While,
    Do,
    Not,

    // ========== Identifiers and constants ==========
    Identifier,
    IntConstant,
    RealConstant,

    // ========== Operators ==========
    Relop,
    Mulop,
    Addop,
    Assignop,

    // ========== Punctuation ==========
    Comma,
    Semicolon,
    Colon,
    RightParen,
    LeftParen,
    RightBracket,
    LeftBracket,
    UnaryMinus,
    UnaryPlus,
    DoubleDot,
    EndMarker,

    // ========== Special ==========
    EndOfFile,
    Error,
}

impl TokenKind {
    /// Number of terminal kinds (parse-table rows).
    pub const COUNT: usize = 37;

    /// Every kind, in row order.
    pub const ALL: [TokenKind; TokenKind::COUNT] = [
        TokenKind::Program,
        TokenKind::Begin,
        TokenKind::End,
        TokenKind::Var,
        TokenKind::Function,
        TokenKind::Procedure,
        TokenKind::Result,
        TokenKind::Integer,
        TokenKind::Real,
        TokenKind::Array,
        TokenKind::Of,
        TokenKind::If,
        TokenKind::Then,
        TokenKind::Else,
        TokenKind::While,
        TokenKind::Do,
        TokenKind::Not,
        TokenKind::Identifier,
        TokenKind::IntConstant,
        TokenKind::RealConstant,
        TokenKind::Relop,
        TokenKind::Mulop,
        TokenKind::Addop,
        TokenKind::Assignop,
        TokenKind::Comma,
        TokenKind::Semicolon,
        TokenKind::Colon,
        TokenKind::RightParen,
        TokenKind::LeftParen,
        TokenKind::RightBracket,
        TokenKind::LeftBracket,
        TokenKind::UnaryMinus,
        TokenKind::UnaryPlus,
        TokenKind::DoubleDot,
        TokenKind::EndMarker,
        TokenKind::EndOfFile,
        TokenKind::Error,
    ];

    /// Dense row index used for table lookups.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-snake-case name used in diagnostics and table dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Program => "PROGRAM",
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::Var => "VAR",
            TokenKind::Function => "FUNCTION",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Result => "RESULT",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::Array => "ARRAY",
            TokenKind::Of => "OF",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Do => "DO",
            TokenKind::Not => "NOT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntConstant => "INTCONSTANT",
            TokenKind::RealConstant => "REALCONSTANT",
            TokenKind::Relop => "RELOP",
            TokenKind::Mulop => "MULOP",
            TokenKind::Addop => "ADDOP",
            TokenKind::Assignop => "ASSIGNOP",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::RightParen => "RIGHTPAREN",
            TokenKind::LeftParen => "LEFTPAREN",
            TokenKind::RightBracket => "RIGHTBRACKET",
            TokenKind::LeftBracket => "LEFTBRACKET",
            TokenKind::UnaryMinus => "UNARYMINUS",
            TokenKind::UnaryPlus => "UNARYPLUS",
            TokenKind::DoubleDot => "DOUBLEDOT",
            TokenKind::EndMarker => "ENDMARKER",
            TokenKind::EndOfFile => "ENDOFFILE",
            TokenKind::Error => "ERROR",
        }
    }

    /// Fixed source spelling for payload-free kinds (`;`, `BEGIN`, ...).
    pub fn spelling(self) -> &'static str {
        match self {
            TokenKind::Assignop => ":=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::RightParen => ")",
            TokenKind::LeftParen => "(",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBracket => "[",
            TokenKind::UnaryMinus => "-",
            TokenKind::UnaryPlus => "+",
            TokenKind::DoubleDot => "..",
            TokenKind::EndMarker => ".",
            TokenKind::EndOfFile | TokenKind::Error => "",
            other => other.name(),
        }
    }

    /// Terminal kind for a reserved word.
    ///
    /// Word operators (`OR`, `DIV`, `MOD`, `AND`) lex as operator tokens and are mapped through
    /// [`TokenKind::for_operator`] instead; this returns their operator class kind for completeness.
    pub fn for_keyword(id: KeywordId) -> TokenKind {
        match id {
            KeywordId::Program => TokenKind::Program,
            KeywordId::Begin => TokenKind::Begin,
            KeywordId::End => TokenKind::End,
            KeywordId::Var => TokenKind::Var,
            KeywordId::Function => TokenKind::Function,
            KeywordId::Procedure => TokenKind::Procedure,
            KeywordId::Result => TokenKind::Result,
            KeywordId::Integer => TokenKind::Integer,
            KeywordId::Real => TokenKind::Real,
            KeywordId::Array => TokenKind::Array,
            KeywordId::Of => TokenKind::Of,
            KeywordId::If => TokenKind::If,
            KeywordId::Then => TokenKind::Then,
            KeywordId::Else => TokenKind::Else,
            KeywordId::While => TokenKind::While,
            KeywordId::Do => TokenKind::Do,
            KeywordId::Not => TokenKind::Not,
            KeywordId::Or => TokenKind::Addop,
            KeywordId::Div | KeywordId::Mod | KeywordId::And => TokenKind::Mulop,
        }
    }

    /// Terminal kind (RELOP/ADDOP/MULOP) an operator lexes to.
    pub fn for_operator(id: OperatorId) -> TokenKind {
        match operators::info_for(id).class {
            OperatorClass::Relational => TokenKind::Relop,
            OperatorClass::Additive => TokenKind::Addop,
            OperatorClass::Multiplicative => TokenKind::Mulop,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// TOKENS
// ============================================================================

/// A token produced by the token source.
#[derive(Debug, Clone)]
pub enum Token {
    /// Payload-free token (reserved words, punctuation, end of file).
    Simple(TokenKind),
    /// Upper-cased identifier.
    Identifier(String),
    /// INTCONSTANT or REALCONSTANT with its source text.
    Constant { kind: TokenKind, text: String },
    /// RELOP/ADDOP/MULOP.
    Operator { kind: TokenKind, op: OperatorId },
    /// Lexical error; halts parsing.
    Error(Box<Diagnostic>),
}

impl Token {
    /// Build an operator token, deriving its kind from the operator class.
    pub fn operator(op: OperatorId) -> Self {
        Token::Operator {
            kind: TokenKind::for_operator(op),
            op,
        }
    }

    /// Build an identifier token (the name is upper-cased).
    pub fn identifier(name: &str) -> Self {
        Token::Identifier(name.to_ascii_uppercase())
    }

    /// Build a constant token.
    pub fn constant(kind: TokenKind, text: impl Into<String>) -> Self {
        Token::Constant {
            kind,
            text: text.into(),
        }
    }

    /// The terminal kind of this token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Simple(kind) => *kind,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Constant { kind, .. } | Token::Operator { kind, .. } => *kind,
            Token::Error(_) => TokenKind::Error,
        }
    }

    /// The textual value: identifier name, constant text, operator spelling, or the fixed spelling.
    pub fn text(&self) -> &str {
        match self {
            Token::Simple(kind) => kind.spelling(),
            Token::Identifier(name) => name,
            Token::Constant { text, .. } => text,
            Token::Operator { op, .. } => operators::as_str(*op),
            Token::Error(diag) => &diag.message,
        }
    }

    /// Intermediate-code opcode for operator tokens.
    pub fn opcode(&self) -> Option<&'static str> {
        match self {
            Token::Operator { op, .. } => Some(operators::info_for(*op).opcode),
            _ => None,
        }
    }

    /// Registry id for operator tokens.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            Token::Operator { op, .. } => Some(*op),
            _ => None,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.text() == other.text()
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.text().hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Simple(kind) => write!(f, "{kind}"),
            _ => write!(f, "{}({})", self.kind(), self.text()),
        }
    }
}
