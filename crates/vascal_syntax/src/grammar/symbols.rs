//! Grammar symbols: terminals, nonterminals and semantic-action markers.
//!
//! Every symbol exposes a dense index within its own kind. Terminal indices are parse-table rows, nonterminal
//! indices are parse-table columns, and action indices are the dispatch keys of the semantic engine.

use std::fmt;

use crate::token::TokenKind;

/// Nonterminals, in parse-table column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NonTerminal {
    Program,
    IdentifierList,
    Declarations,
    SubDeclarations,
    CompoundStatement,
    IdentifierListTail,
    DeclarationList,
    Type,
    DeclarationListTail,
    StandardType,
    ArrayType,
    SubprogramDeclaration,
    SubprogramHead,
    Arguments,
    ParameterList,
    ParameterListTail,
    StatementList,
    Statement,
    StatementListTail,
    ElementaryStatement,
    Expression,
    ElseClause,
    EsTail,
    Subscript,
    Parameters,
    ExpressionList,
    ExpressionListTail,
    SimpleExpression,
    ExpressionTail,
    Term,
    SimpleExpressionTail,
    Sign,
    Factor,
    TermTail,
    FactorTail,
    ActualParameters,
    Goal,
    Constant,
}

impl NonTerminal {
    /// Number of nonterminals (parse-table columns).
    pub const COUNT: usize = 38;

    /// Every nonterminal, in column order.
    pub const ALL: [NonTerminal; NonTerminal::COUNT] = [
        NonTerminal::Program,
        NonTerminal::IdentifierList,
        NonTerminal::Declarations,
        NonTerminal::SubDeclarations,
        NonTerminal::CompoundStatement,
        NonTerminal::IdentifierListTail,
        NonTerminal::DeclarationList,
        NonTerminal::Type,
        NonTerminal::DeclarationListTail,
        NonTerminal::StandardType,
        NonTerminal::ArrayType,
        NonTerminal::SubprogramDeclaration,
        NonTerminal::SubprogramHead,
        NonTerminal::Arguments,
        NonTerminal::ParameterList,
        NonTerminal::ParameterListTail,
        NonTerminal::StatementList,
        NonTerminal::Statement,
        NonTerminal::StatementListTail,
        NonTerminal::ElementaryStatement,
        NonTerminal::Expression,
        NonTerminal::ElseClause,
        NonTerminal::EsTail,
        NonTerminal::Subscript,
        NonTerminal::Parameters,
        NonTerminal::ExpressionList,
        NonTerminal::ExpressionListTail,
        NonTerminal::SimpleExpression,
        NonTerminal::ExpressionTail,
        NonTerminal::Term,
        NonTerminal::SimpleExpressionTail,
        NonTerminal::Sign,
        NonTerminal::Factor,
        NonTerminal::TermTail,
        NonTerminal::FactorTail,
        NonTerminal::ActualParameters,
        NonTerminal::Goal,
        NonTerminal::Constant,
    ];

    /// Dense column index used for table lookups.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`NonTerminal::index`].
    pub fn from_index(index: usize) -> Option<NonTerminal> {
        NonTerminal::ALL.get(index).copied()
    }

    /// Snake-case grammar name.
    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Program => "program",
            NonTerminal::IdentifierList => "identifier_list",
            NonTerminal::Declarations => "declarations",
            NonTerminal::SubDeclarations => "sub_declarations",
            NonTerminal::CompoundStatement => "compound_statement",
            NonTerminal::IdentifierListTail => "identifier_list_tail",
            NonTerminal::DeclarationList => "declaration_list",
            NonTerminal::Type => "type",
            NonTerminal::DeclarationListTail => "declaration_list_tail",
            NonTerminal::StandardType => "standard_type",
            NonTerminal::ArrayType => "array_type",
            NonTerminal::SubprogramDeclaration => "subprogram_declaration",
            NonTerminal::SubprogramHead => "subprogram_head",
            NonTerminal::Arguments => "arguments",
            NonTerminal::ParameterList => "parameter_list",
            NonTerminal::ParameterListTail => "parameter_list_tail",
            NonTerminal::StatementList => "statement_list",
            NonTerminal::Statement => "statement",
            NonTerminal::StatementListTail => "statement_list_tail",
            NonTerminal::ElementaryStatement => "elementary_statement",
            NonTerminal::Expression => "expression",
            NonTerminal::ElseClause => "else_clause",
            NonTerminal::EsTail => "es_tail",
            NonTerminal::Subscript => "subscript",
            NonTerminal::Parameters => "parameters",
            NonTerminal::ExpressionList => "expression_list",
            NonTerminal::ExpressionListTail => "expression_list_tail",
            NonTerminal::SimpleExpression => "simple_expression",
            NonTerminal::ExpressionTail => "expression_tail",
            NonTerminal::Term => "term",
            NonTerminal::SimpleExpressionTail => "simple_expression_tail",
            NonTerminal::Sign => "sign",
            NonTerminal::Factor => "factor",
            NonTerminal::TermTail => "term_tail",
            NonTerminal::FactorTail => "factor_tail",
            NonTerminal::ActualParameters => "actual_parameters",
            NonTerminal::Goal => "Goal",
            NonTerminal::Constant => "constant",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

/// Semantic action id (`#n` in the grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u8);

impl ActionId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A symbol on the parser's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarSymbol {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
    Action(ActionId),
}

impl GrammarSymbol {
    /// Dense index within the symbol's own kind.
    pub fn index(self) -> usize {
        match self {
            GrammarSymbol::Terminal(kind) => kind.index(),
            GrammarSymbol::NonTerminal(nt) => nt.index(),
            GrammarSymbol::Action(id) => id.index(),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GrammarSymbol::Terminal(_))
    }

    pub fn is_nonterminal(self) -> bool {
        matches!(self, GrammarSymbol::NonTerminal(_))
    }

    pub fn is_action(self) -> bool {
        matches!(self, GrammarSymbol::Action(_))
    }
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSymbol::Terminal(kind) => write!(f, "{kind}"),
            GrammarSymbol::NonTerminal(nt) => write!(f, "{nt}"),
            GrammarSymbol::Action(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonterminal_indices_are_dense_and_ordered() {
        for (i, nt) in NonTerminal::ALL.iter().enumerate() {
            assert_eq!(nt.index(), i, "{nt} out of order");
            assert_eq!(NonTerminal::from_index(i), Some(*nt));
        }
        assert_eq!(NonTerminal::Goal.index(), 36);
        assert_eq!(NonTerminal::from_index(NonTerminal::COUNT), None);
    }

    #[test]
    fn symbol_discriminants() {
        let t = GrammarSymbol::Terminal(TokenKind::Semicolon);
        let n = GrammarSymbol::NonTerminal(NonTerminal::Factor);
        let a = GrammarSymbol::Action(ActionId(34));
        assert!(t.is_terminal() && !t.is_nonterminal() && !t.is_action());
        assert!(n.is_nonterminal() && !n.is_terminal());
        assert!(a.is_action() && !a.is_terminal());
        assert_eq!(a.index(), 34);
        assert_eq!(t.index(), TokenKind::Semicolon.index());
    }
}
