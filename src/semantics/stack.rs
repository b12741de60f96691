//! The engine's operand stack.
//!
//! Values of every kind share one stack. Each action pops a fixed sequence of kinds; the typed `pop_*` helpers
//! return `None` when the top does not have the requested kind.
//!
//! ## Notes
//! - Panic-mode recovery discards grammar symbols, so actions can run against a stack that no longer holds what their
//!   production pushed. A mismatch after recovery is expected and logged at `debug`; before any recovery it is a
//!   grammar/action defect and logged at `warn`.

use std::fmt;

use vascal_syntax::Token;

use super::quads::BackpatchList;
use super::symbols::{DataType, EntryId};

/// Classification of the expression on top of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EType {
    Arithmetic,
    Relational,
}

/// One operand stack slot.
#[derive(Debug, Clone, PartialEq)]
pub enum StackValue {
    Token(Token),
    Entry(EntryId),
    EType(EType),
    List(BackpatchList),
    Type(DataType),
    Operator(Token),
    /// Array element offset of the entry below it, `None` for a whole variable.
    Offset(Option<EntryId>),
    /// Parameter counter of the subprogram header being declared.
    Counter(usize),
    /// Quadruple index (loop entry).
    Quad(usize),
}

impl StackValue {
    fn kind_name(&self) -> &'static str {
        match self {
            StackValue::Token(_) => "token",
            StackValue::Entry(_) => "entry",
            StackValue::EType(_) => "etype",
            StackValue::List(_) => "list",
            StackValue::Type(_) => "type",
            StackValue::Operator(_) => "operator",
            StackValue::Offset(_) => "offset",
            StackValue::Counter(_) => "counter",
            StackValue::Quad(_) => "quad",
        }
    }
}

impl fmt::Display for StackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackValue::Token(token) | StackValue::Operator(token) => write!(f, "{token}"),
            StackValue::Entry(id) => write!(f, "entry#{id}"),
            StackValue::EType(etype) => write!(f, "{etype:?}"),
            StackValue::List(list) => write!(f, "{:?}", list.indices()),
            StackValue::Type(ty) => write!(f, "{ty}"),
            StackValue::Offset(Some(id)) => write!(f, "offset#{id}"),
            StackValue::Offset(None) => f.write_str("offset(none)"),
            StackValue::Counter(n) => write!(f, "counter({n})"),
            StackValue::Quad(q) => write!(f, "quad({q})"),
        }
    }
}

/// Heterogeneous LIFO stack of [`StackValue`]s.
#[derive(Debug, Default)]
pub struct OperandStack {
    values: Vec<StackValue>,
    recovered: bool,
}

macro_rules! typed_pop {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&mut self) -> Option<$ty> {
            match self.pop_raw(stringify!($variant))? {
                StackValue::$variant(value) => Some(value),
                other => {
                    self.mismatch(stringify!($variant), &other);
                    None
                }
            }
        }
    };
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: StackValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn peek(&self) -> Option<&StackValue> {
        self.values.last()
    }

    /// True when the top slot is a token.
    pub fn top_is_token(&self) -> bool {
        matches!(self.peek(), Some(StackValue::Token(_)))
    }

    /// Expression classification on top, without popping.
    pub fn peek_etype(&self) -> Option<EType> {
        match self.peek() {
            Some(StackValue::EType(etype)) => Some(*etype),
            _ => None,
        }
    }

    /// Drop everything after panic-mode recovery. Later mismatches are logged as expected.
    pub fn reset(&mut self) {
        self.values.clear();
        self.recovered = true;
    }

    fn pop_raw(&mut self, wanted: &str) -> Option<StackValue> {
        let value = self.values.pop();
        if value.is_none() {
            if self.recovered {
                tracing::debug!(wanted, "operand stack empty");
            } else {
                tracing::warn!(wanted, "operand stack empty");
            }
        }
        value
    }

    fn mismatch(&self, wanted: &str, found: &StackValue) {
        if self.recovered {
            tracing::debug!(wanted, found = found.kind_name(), "operand stack mismatch");
        } else {
            tracing::warn!(wanted, found = %found, "operand stack mismatch");
        }
    }

    typed_pop!(pop_token, Token, Token);
    typed_pop!(pop_entry, Entry, EntryId);
    typed_pop!(pop_etype, EType, EType);
    typed_pop!(pop_list, List, BackpatchList);
    typed_pop!(pop_type, Type, DataType);
    typed_pop!(pop_operator, Operator, Token);
    typed_pop!(
        /// `Some(None)` is a present slot with no offset.
        pop_offset,
        Offset,
        Option<EntryId>
    );
    typed_pop!(pop_counter, Counter, usize);
    typed_pop!(pop_quad, Quad, usize);

    /// Pop consecutive tokens off the top, returned bottom-to-top (source order).
    pub fn pop_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(StackValue::Token(_)) = self.peek() {
            if let Some(StackValue::Token(token)) = self.values.pop() {
                tokens.push(token);
            }
        }
        tokens.reverse();
        tokens
    }

    /// Pop `n` entries, returned bottom-to-top (source order). Non-entry slots are skipped over and dropped.
    pub fn pop_entries(&mut self, n: usize) -> Vec<EntryId> {
        let mut entries: Vec<EntryId> = (0..n).filter_map(|_| self.pop_entry()).collect();
        entries.reverse();
        entries
    }
}

#[cfg(test)]
mod tests {
    use vascal_syntax::TokenKind;

    use super::*;

    #[test]
    fn test_typed_pops() {
        let mut stack = OperandStack::new();
        stack.push(StackValue::Entry(3));
        stack.push(StackValue::EType(EType::Arithmetic));
        assert_eq!(stack.peek_etype(), Some(EType::Arithmetic));
        assert_eq!(stack.pop_etype(), Some(EType::Arithmetic));
        assert_eq!(stack.pop_entry(), Some(3));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_mismatch_discards_top() {
        let mut stack = OperandStack::new();
        stack.push(StackValue::Counter(1));
        stack.push(StackValue::Quad(9));
        assert_eq!(stack.pop_counter(), None);
        assert_eq!(stack.pop_counter(), Some(1));
        assert_eq!(stack.pop_counter(), None);
    }

    #[test]
    fn test_pop_tokens_in_source_order() {
        let mut stack = OperandStack::new();
        stack.push(StackValue::Counter(0));
        stack.push(StackValue::Token(Token::identifier("a")));
        stack.push(StackValue::Token(Token::identifier("b")));
        let names: Vec<_> = stack.pop_tokens().iter().map(|t| t.text().to_string()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(stack.pop_counter(), Some(0));
    }

    #[test]
    fn test_pop_entries_in_source_order() {
        let mut stack = OperandStack::new();
        for id in [4, 5, 6] {
            stack.push(StackValue::Entry(id));
        }
        assert_eq!(stack.pop_entries(2), vec![5, 6]);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_reset_clears() {
        let mut stack = OperandStack::new();
        stack.push(StackValue::Token(Token::Simple(TokenKind::Begin)));
        stack.reset();
        assert!(stack.is_empty());
        assert_eq!(stack.pop_entry(), None);
    }
}
