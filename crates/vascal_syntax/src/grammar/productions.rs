//! The Vascal production list.
//!
//! Production indices are positions in [`PRODUCTIONS`]; the parse table stores them in its `Production(n)` cells.
//! Right-hand sides are listed left to right; the parser pushes them reversed.

use super::symbols::{ActionId, GrammarSymbol, NonTerminal};
use crate::token::TokenKind;

/// One grammar rule `lhs ::= rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Production {
    pub lhs: NonTerminal,
    pub rhs: &'static [GrammarSymbol],
}

impl Production {
    /// True when the right-hand side is literally empty.
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// True when the right-hand side contains only semantic actions (derives ε but still runs code).
    pub fn is_action_only(&self) -> bool {
        !self.rhs.is_empty() && self.rhs.iter().all(|s| s.is_action())
    }
}

const fn t(kind: TokenKind) -> GrammarSymbol {
    GrammarSymbol::Terminal(kind)
}

const fn nt(nt: NonTerminal) -> GrammarSymbol {
    GrammarSymbol::NonTerminal(nt)
}

const fn act(id: u8) -> GrammarSymbol {
    GrammarSymbol::Action(ActionId(id))
}

const fn rule(lhs: NonTerminal, rhs: &'static [GrammarSymbol]) -> Production {
    Production { lhs, rhs }
}

use NonTerminal as N;
use TokenKind as T;

/// Every production, in index order.
pub static PRODUCTIONS: &[Production] = &[
    // 0
    rule(N::Goal, &[nt(N::Program)]),
    rule(
        N::Program,
        &[
            t(T::Program),
            t(T::Identifier),
            act(13),
            t(T::LeftParen),
            nt(N::IdentifierList),
            t(T::RightParen),
            act(9),
            t(T::Semicolon),
            nt(N::Declarations),
            nt(N::SubDeclarations),
            act(56),
            nt(N::CompoundStatement),
            act(55),
            t(T::EndMarker),
        ],
    ),
    rule(N::IdentifierList, &[t(T::Identifier), act(13), nt(N::IdentifierListTail)]),
    rule(
        N::IdentifierListTail,
        &[t(T::Comma), t(T::Identifier), act(13), nt(N::IdentifierListTail)],
    ),
    rule(N::IdentifierListTail, &[]),
    // 5
    rule(N::Declarations, &[t(T::Var), nt(N::DeclarationList)]),
    rule(N::Declarations, &[]),
    rule(
        N::DeclarationList,
        &[
            nt(N::IdentifierList),
            t(T::Colon),
            nt(N::Type),
            act(3),
            t(T::Semicolon),
            nt(N::DeclarationListTail),
        ],
    ),
    rule(
        N::DeclarationListTail,
        &[
            nt(N::IdentifierList),
            t(T::Colon),
            nt(N::Type),
            act(3),
            t(T::Semicolon),
            nt(N::DeclarationListTail),
        ],
    ),
    rule(N::DeclarationListTail, &[]),
    // 10
    rule(N::Type, &[nt(N::StandardType)]),
    rule(N::Type, &[nt(N::ArrayType)]),
    rule(
        N::ArrayType,
        &[
            t(T::Array),
            act(6),
            t(T::LeftBracket),
            t(T::IntConstant),
            act(7),
            t(T::DoubleDot),
            t(T::IntConstant),
            act(7),
            t(T::RightBracket),
            t(T::Of),
            nt(N::StandardType),
        ],
    ),
    rule(N::StandardType, &[t(T::Integer), act(4)]),
    rule(N::StandardType, &[t(T::Real), act(4)]),
    // 15
    rule(
        N::SubDeclarations,
        &[nt(N::SubprogramDeclaration), t(T::Semicolon), nt(N::SubDeclarations)],
    ),
    rule(N::SubDeclarations, &[]),
    rule(
        N::SubprogramDeclaration,
        &[nt(N::SubprogramHead), nt(N::Declarations), act(5), nt(N::CompoundStatement), act(11)],
    ),
    rule(
        N::SubprogramHead,
        &[
            t(T::Function),
            t(T::Identifier),
            act(15),
            nt(N::Arguments),
            act(20),
            t(T::Colon),
            t(T::Result),
            nt(N::StandardType),
            act(16),
            t(T::Semicolon),
        ],
    ),
    rule(
        N::SubprogramHead,
        &[
            t(T::Procedure),
            t(T::Identifier),
            act(17),
            nt(N::Arguments),
            act(20),
            t(T::Semicolon),
        ],
    ),
    // 20
    rule(N::Arguments, &[t(T::LeftParen), nt(N::ParameterList), t(T::RightParen)]),
    rule(N::Arguments, &[]),
    rule(
        N::ParameterList,
        &[
            nt(N::IdentifierList),
            t(T::Colon),
            nt(N::Type),
            act(21),
            nt(N::ParameterListTail),
        ],
    ),
    rule(
        N::ParameterListTail,
        &[
            t(T::Semicolon),
            nt(N::IdentifierList),
            t(T::Colon),
            nt(N::Type),
            act(21),
            nt(N::ParameterListTail),
        ],
    ),
    rule(N::ParameterListTail, &[]),
    // 25
    rule(N::CompoundStatement, &[t(T::Begin), nt(N::StatementList), t(T::End)]),
    rule(N::StatementList, &[nt(N::Statement), nt(N::StatementListTail)]),
    rule(
        N::StatementListTail,
        &[t(T::Semicolon), nt(N::Statement), nt(N::StatementListTail)],
    ),
    rule(N::StatementListTail, &[]),
    rule(N::Statement, &[nt(N::ElementaryStatement)]),
    // 30
    rule(
        N::Statement,
        &[
            t(T::If),
            nt(N::Expression),
            act(22),
            t(T::Then),
            nt(N::Statement),
            nt(N::ElseClause),
        ],
    ),
    rule(
        N::Statement,
        &[
            t(T::While),
            act(24),
            nt(N::Expression),
            act(25),
            t(T::Do),
            nt(N::Statement),
            act(26),
        ],
    ),
    rule(N::ElseClause, &[t(T::Else), act(27), nt(N::Statement), act(28)]),
    rule(N::ElseClause, &[act(29)]),
    rule(N::ElementaryStatement, &[t(T::Identifier), act(30), nt(N::EsTail)]),
    // 35
    rule(N::ElementaryStatement, &[nt(N::CompoundStatement)]),
    rule(
        N::EsTail,
        &[act(53), nt(N::Subscript), t(T::Assignop), nt(N::Expression), act(31)],
    ),
    rule(N::EsTail, &[act(54), nt(N::Parameters)]),
    rule(
        N::Subscript,
        &[act(32), t(T::LeftBracket), nt(N::Expression), t(T::RightBracket), act(33)],
    ),
    rule(N::Subscript, &[act(34)]),
    // 40
    rule(
        N::Parameters,
        &[act(35), t(T::LeftParen), nt(N::ExpressionList), t(T::RightParen), act(51)],
    ),
    rule(N::Parameters, &[act(36)]),
    rule(N::ExpressionList, &[nt(N::Expression), act(37), nt(N::ExpressionListTail)]),
    rule(
        N::ExpressionListTail,
        &[t(T::Comma), nt(N::Expression), act(37), nt(N::ExpressionListTail)],
    ),
    rule(N::ExpressionListTail, &[]),
    // 45
    rule(N::Expression, &[nt(N::SimpleExpression), nt(N::ExpressionTail)]),
    rule(
        N::ExpressionTail,
        &[t(T::Relop), act(38), nt(N::SimpleExpression), act(39)],
    ),
    rule(N::ExpressionTail, &[]),
    rule(N::SimpleExpression, &[nt(N::Term), nt(N::SimpleExpressionTail)]),
    rule(
        N::SimpleExpression,
        &[nt(N::Sign), act(40), nt(N::Term), act(41), nt(N::SimpleExpressionTail)],
    ),
    // 50
    rule(
        N::SimpleExpressionTail,
        &[t(T::Addop), act(42), nt(N::Term), act(43), nt(N::SimpleExpressionTail)],
    ),
    rule(N::SimpleExpressionTail, &[]),
    rule(N::Term, &[nt(N::Factor), nt(N::TermTail)]),
    rule(
        N::TermTail,
        &[t(T::Mulop), act(44), nt(N::Factor), act(45), nt(N::TermTail)],
    ),
    rule(N::TermTail, &[]),
    // 55
    rule(N::Factor, &[t(T::Identifier), act(46), nt(N::FactorTail), act(48)]),
    rule(N::Factor, &[nt(N::Constant), act(46)]),
    rule(N::Factor, &[t(T::LeftParen), nt(N::Expression), t(T::RightParen)]),
    rule(N::Factor, &[t(T::Not), nt(N::Factor), act(47)]),
    rule(
        N::FactorTail,
        &[act(32), t(T::LeftBracket), nt(N::Expression), t(T::RightBracket), act(33)],
    ),
    // 60
    rule(N::FactorTail, &[nt(N::ActualParameters)]),
    rule(
        N::ActualParameters,
        &[act(49), t(T::LeftParen), nt(N::ExpressionList), t(T::RightParen), act(50)],
    ),
    rule(N::ActualParameters, &[act(34)]),
    rule(N::Sign, &[t(T::UnaryPlus)]),
    rule(N::Sign, &[t(T::UnaryMinus)]),
    // 65
    rule(N::Constant, &[t(T::IntConstant)]),
    rule(N::Constant, &[t(T::RealConstant)]),
];

/// Productions whose left-hand side is `lhs`, with their indices.
pub fn productions_for(lhs: NonTerminal) -> impl Iterator<Item = (usize, &'static Production)> {
    PRODUCTIONS.iter().enumerate().filter(move |(_, p)| p.lhs == lhs)
}

/// Every action id that appears somewhere in the grammar, ascending.
pub fn referenced_actions() -> Vec<ActionId> {
    let mut ids: Vec<ActionId> = PRODUCTIONS
        .iter()
        .flat_map(|p| p.rhs.iter())
        .filter_map(|s| match s {
            GrammarSymbol::Action(id) => Some(*id),
            _ => None,
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
