//! LL(1) parse table.
//!
//! The table is derived from [`PRODUCTIONS`] once per process and cached. Rows are terminal kinds, columns are
//! nonterminals, and each cell is a [`Code`].
//!
//! ## Cell filling
//! Earlier steps win; later steps only write cells that are still empty.
//! 1. `FIRST(rhs)` of every production. The first claim wins, which binds `ELSE` to the nearest `IF`.
//! 2. `FOLLOW(lhs)` of nullable productions. A literally empty right-hand side is stored as [`Code::Epsilon`];
//!    action-only right-hand sides stay `Production(n)` so their actions run.
//! 3. Delimited list tails `A -> d beta A` (`d` is `;` or `,`) also claim `FIRST(beta)`. A missing delimiter is then
//!    reported as an unmatched terminal and virtually inserted instead of triggering panic mode.
//! 4. A nullable nonterminal derives ε for any remaining cell.
//! 5. Everything else is [`Code::Error`] with the column's message id.

use std::fmt::Write as _;
use std::sync::LazyLock;

use super::productions::{PRODUCTIONS, Production};
use super::symbols::{GrammarSymbol, NonTerminal};
use crate::token::TokenKind;

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// Derive the empty string: pop only.
    Epsilon,
    /// Push the right-hand side of production `n`.
    Production(usize),
    /// Report message `id` and recover.
    Error(usize),
}

// ============================================================================
// TERMINAL SETS
// ============================================================================

/// A set of terminal kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalSet(u64);

impl TerminalSet {
    pub const EMPTY: TerminalSet = TerminalSet(0);

    pub fn insert(&mut self, kind: TokenKind) -> bool {
        let bit = 1u64 << kind.index();
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    pub fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u64 << kind.index()) != 0
    }

    /// Add every member of `other`; true if the set grew.
    pub fn union_with(&mut self, other: TerminalSet) -> bool {
        let before = self.0;
        self.0 |= other.0;
        self.0 != before
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

// ============================================================================
// FIRST / FOLLOW
// ============================================================================

/// FIRST sets and nullability for every nonterminal.
#[derive(Debug, Clone)]
pub struct FirstSets {
    first: [TerminalSet; NonTerminal::COUNT],
    nullable: [bool; NonTerminal::COUNT],
}

impl FirstSets {
    pub fn compute(productions: &[Production]) -> Self {
        let mut sets = Self {
            first: [TerminalSet::EMPTY; NonTerminal::COUNT],
            nullable: [false; NonTerminal::COUNT],
        };
        let mut changed = true;
        while changed {
            changed = false;
            for p in productions {
                let (first, nullable) = sets.of_sequence(p.rhs);
                let lhs = p.lhs.index();
                changed |= sets.first[lhs].union_with(first);
                if nullable && !sets.nullable[lhs] {
                    sets.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
        sets
    }

    pub fn first(&self, nt: NonTerminal) -> TerminalSet {
        self.first[nt.index()]
    }

    pub fn is_nullable(&self, nt: NonTerminal) -> bool {
        self.nullable[nt.index()]
    }

    /// FIRST of a symbol sequence and whether the whole sequence can derive ε.
    ///
    /// Action symbols are transparent.
    pub fn of_sequence(&self, symbols: &[GrammarSymbol]) -> (TerminalSet, bool) {
        let mut set = TerminalSet::EMPTY;
        for symbol in symbols {
            match *symbol {
                GrammarSymbol::Terminal(kind) => {
                    set.insert(kind);
                    return (set, false);
                }
                GrammarSymbol::NonTerminal(nt) => {
                    set.union_with(self.first(nt));
                    if !self.is_nullable(nt) {
                        return (set, false);
                    }
                }
                GrammarSymbol::Action(_) => {}
            }
        }
        (set, true)
    }
}

/// FOLLOW sets for every nonterminal, with `Goal` followed by ENDOFFILE.
pub fn follow_sets(productions: &[Production], first: &FirstSets) -> [TerminalSet; NonTerminal::COUNT] {
    let mut follow = [TerminalSet::EMPTY; NonTerminal::COUNT];
    follow[NonTerminal::Goal.index()].insert(TokenKind::EndOfFile);

    let mut changed = true;
    while changed {
        changed = false;
        for p in productions {
            for (i, symbol) in p.rhs.iter().enumerate() {
                let GrammarSymbol::NonTerminal(nt) = *symbol else {
                    continue;
                };
                let (rest, rest_nullable) = first.of_sequence(&p.rhs[i + 1..]);
                changed |= follow[nt.index()].union_with(rest);
                if rest_nullable {
                    let lhs_follow = follow[p.lhs.index()];
                    changed |= follow[nt.index()].union_with(lhs_follow);
                }
            }
        }
    }
    follow
}

// ============================================================================
// PARSE TABLE
// ============================================================================

/// The computed parse table.
#[derive(Debug, Clone)]
pub struct ParseTable {
    cells: Vec<Code>,
}

static PARSE_TABLE: LazyLock<ParseTable> = LazyLock::new(|| ParseTable::build(PRODUCTIONS));

/// The process-wide parse table for the Vascal grammar.
pub fn parse_table() -> &'static ParseTable {
    &PARSE_TABLE
}

impl ParseTable {
    /// Build the table for `productions`.
    pub fn build(productions: &[Production]) -> Self {
        let first = FirstSets::compute(productions);
        let follow = follow_sets(productions, &first);
        let mut cells: Vec<Option<Code>> = vec![None; TokenKind::COUNT * NonTerminal::COUNT];
        let slot = |kind: TokenKind, nt: NonTerminal| kind.index() * NonTerminal::COUNT + nt.index();
        let encode = |n: usize| {
            if productions[n].is_empty() {
                Code::Epsilon
            } else {
                Code::Production(n)
            }
        };

        // 1. FIRST
        for (n, p) in productions.iter().enumerate() {
            let (set, _) = first.of_sequence(p.rhs);
            for kind in set.iter() {
                cells[slot(kind, p.lhs)].get_or_insert(encode(n));
            }
        }

        // 2. FOLLOW for nullable productions
        for (n, p) in productions.iter().enumerate() {
            if first.of_sequence(p.rhs).1 {
                for kind in follow[p.lhs.index()].iter() {
                    cells[slot(kind, p.lhs)].get_or_insert(encode(n));
                }
            }
        }

        // 3. delimited list tails
        for (n, p) in productions.iter().enumerate() {
            let [GrammarSymbol::Terminal(delimiter), beta @ .., GrammarSymbol::NonTerminal(last)] = p.rhs else {
                continue;
            };
            if *last != p.lhs || !matches!(delimiter, TokenKind::Semicolon | TokenKind::Comma) {
                continue;
            }
            let (set, _) = first.of_sequence(beta);
            for kind in set.iter() {
                cells[slot(kind, p.lhs)].get_or_insert(encode(n));
            }
        }

        // 4. nullable defaults
        for nt in NonTerminal::ALL {
            let Some(n) = productions
                .iter()
                .position(|p| p.lhs == nt && first.of_sequence(p.rhs).1)
            else {
                continue;
            };
            for kind in TokenKind::ALL {
                cells[slot(kind, nt)].get_or_insert(encode(n));
            }
        }

        // 5. errors
        let cells = cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.unwrap_or_else(|| {
                    let column = i % NonTerminal::COUNT;
                    let id = if column == NonTerminal::Program.index() {
                        NonTerminal::Goal.index()
                    } else {
                        column
                    };
                    Code::Error(id)
                })
            })
            .collect();

        Self { cells }
    }

    /// Look up the cell for (current token kind, predicted nonterminal).
    pub fn lookup(&self, kind: TokenKind, nt: NonTerminal) -> Code {
        self.cells[kind.index() * NonTerminal::COUNT + nt.index()]
    }

    /// Render the table: one line per row listing its non-error cells, then the productions.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for kind in TokenKind::ALL {
            let _ = write!(out, "{:<14}", kind.name());
            for nt in NonTerminal::ALL {
                match self.lookup(kind, nt) {
                    Code::Epsilon => {
                        let _ = write!(out, " {}=e", nt.name());
                    }
                    Code::Production(n) => {
                        let _ = write!(out, " {}={n}", nt.name());
                    }
                    Code::Error(_) => {}
                }
            }
            out.push('\n');
        }
        out.push('\n');
        for (n, p) in PRODUCTIONS.iter().enumerate() {
            let _ = write!(out, "{n:>3}: {} ::=", p.lhs);
            if p.rhs.is_empty() {
                out.push_str(" e");
            }
            for symbol in p.rhs {
                let _ = write!(out, " {symbol}");
            }
            out.push('\n');
        }
        out
    }
}

/// Right-hand side of production `n`.
pub fn rhs(n: usize) -> &'static [GrammarSymbol] {
    match PRODUCTIONS.get(n) {
        Some(p) => p.rhs,
        None => &[],
    }
}

/// Message for an `Error(id)` cell.
pub fn error_message(id: usize) -> &'static str {
    let Some(nt) = NonTerminal::from_index(id) else {
        return "Unexpected input";
    };
    match nt {
        NonTerminal::Program | NonTerminal::Goal => "The program must start with the keyword 'PROGRAM'",
        NonTerminal::IdentifierList => "Missing an identifier",
        NonTerminal::Declarations => "A block of code must begin with keyword VAR, BEGIN, FUNCTION, or PROCEDURE",
        NonTerminal::SubDeclarations => {
            "An inner block of code must begin with keyword BEGIN, FUNCTION, OR PROCEDURE"
        }
        NonTerminal::CompoundStatement => "Missing BEGIN statement",
        NonTerminal::IdentifierListTail => "Missing comma, colon or right paren",
        NonTerminal::DeclarationList => "Missing an identifier after the keyword 'VAR'",
        NonTerminal::Type => "Type not valid: The type must be either an integer, real, or an array",
        NonTerminal::DeclarationListTail => "An identifier must be placed after the semicolon",
        NonTerminal::StandardType => "The type must be an integer or a real number",
        NonTerminal::ArrayType => "An array declaration must start with keyword ARRAY",
        NonTerminal::SubprogramDeclaration | NonTerminal::SubprogramHead => {
            "Expected this block of code to start with keyword FUNCTION or PROCEDURE"
        }
        NonTerminal::Arguments => {
            "Missing a colon after function declaration or a semicolon after procedure declaration"
        }
        NonTerminal::ParameterList => "Parameters of a function or procedure must be identifiers",
        NonTerminal::ParameterListTail => "Missing a semicolon or right paren",
        NonTerminal::StatementList | NonTerminal::Statement => "BEGIN, IF, WHILE, or an identifier expected",
        NonTerminal::StatementListTail => "Semicolon or END expected",
        NonTerminal::ElementaryStatement => "BEGIN or an identifier expected",
        NonTerminal::Expression => "A NOT, identifier, constant, or a paren expected",
        NonTerminal::ElseClause => "After a then-statement, an END, ELSE or semicolon expected",
        NonTerminal::EsTail => {
            "After the identifier, an END, ELSE, semicolon, left paren, left bracket, or an ASSIGNOP expected"
        }
        NonTerminal::Subscript => "Badly formed subscript",
        NonTerminal::Parameters => "After a list of parameters, a delimiter expected",
        NonTerminal::ExpressionList | NonTerminal::SimpleExpression | NonTerminal::Factor => {
            "An expression must start with an identifier, constant, left paren, or keyword NOT"
        }
        NonTerminal::ExpressionListTail => "Comma or right paren expected",
        NonTerminal::ExpressionTail | NonTerminal::SimpleExpressionTail => {
            "There is no end to this expression. Expected an end, then, else, do, operator, semicolon, paren or bracket."
        }
        NonTerminal::Term => "Expected an identifier, constant, NOT, or a left paren",
        NonTerminal::Sign => "Expected a sign (a '+' or a '-')",
        NonTerminal::TermTail => {
            "There is no end to this term. Expected an end, then, else, do, operator, semicolon, paren or bracket."
        }
        NonTerminal::FactorTail => {
            "There is no end to this factor. Expected an end, then, else, do, operator, semicolon, paren or bracket."
        }
        NonTerminal::ActualParameters => "Missing keywords, operators, or punctuation after the list of parameters",
        NonTerminal::Constant => "A constant must either be an integer or a real number",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_sets() -> FirstSets {
        FirstSets::compute(PRODUCTIONS)
    }

    #[test]
    fn terminal_set_basics() {
        let mut set = TerminalSet::EMPTY;
        assert!(set.is_empty());
        assert!(set.insert(TokenKind::Error));
        assert!(!set.insert(TokenKind::Error));
        assert!(set.contains(TokenKind::Error));
        assert!(!set.contains(TokenKind::Program));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![TokenKind::Error]);
    }

    #[test]
    fn nullability() {
        let first = first_sets();
        for nt in [
            NonTerminal::Declarations,
            NonTerminal::SubDeclarations,
            NonTerminal::Arguments,
            NonTerminal::ElseClause,
            NonTerminal::Subscript,
            NonTerminal::Parameters,
            NonTerminal::FactorTail,
            NonTerminal::ActualParameters,
            NonTerminal::TermTail,
        ] {
            assert!(first.is_nullable(nt), "{nt} should be nullable");
        }
        for nt in [NonTerminal::Goal, NonTerminal::Statement, NonTerminal::Factor, NonTerminal::Expression] {
            assert!(!first.is_nullable(nt), "{nt} should not be nullable");
        }
    }

    #[test]
    fn first_of_expression() {
        let first = first_sets().first(NonTerminal::Expression);
        let kinds: Vec<_> = first.iter().collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Not,
                TokenKind::Identifier,
                TokenKind::IntConstant,
                TokenKind::RealConstant,
                TokenKind::LeftParen,
                TokenKind::UnaryMinus,
                TokenKind::UnaryPlus,
            ]
        );
    }

    #[test]
    fn grammar_has_no_first_first_conflicts_except_dangling_else() {
        let first = first_sets();
        let follow = follow_sets(PRODUCTIONS, &first);
        for nt in NonTerminal::ALL {
            let mut claimed = TerminalSet::EMPTY;
            for p in PRODUCTIONS.iter().filter(|p| p.lhs == nt) {
                let (mut set, nullable) = first.of_sequence(p.rhs);
                if nullable {
                    set.union_with(follow[nt.index()]);
                }
                for kind in set.iter() {
                    let conflict = !claimed.insert(kind);
                    let dangling_else = nt == NonTerminal::ElseClause && kind == TokenKind::Else;
                    assert!(!conflict || dangling_else, "LL(1) conflict on ({kind}, {nt})");
                }
            }
        }
    }

    #[test]
    fn lookups() {
        let table = parse_table();
        assert_eq!(table.lookup(TokenKind::Program, NonTerminal::Goal), Code::Production(0));
        assert_eq!(table.lookup(TokenKind::Else, NonTerminal::ElseClause), Code::Production(32));
        assert_eq!(table.lookup(TokenKind::Semicolon, NonTerminal::ElseClause), Code::Production(33));
        assert_eq!(table.lookup(TokenKind::End, NonTerminal::StatementListTail), Code::Epsilon);
        assert_eq!(table.lookup(TokenKind::Assignop, NonTerminal::Subscript), Code::Production(39));
        assert_eq!(table.lookup(TokenKind::Identifier, NonTerminal::Statement), Code::Production(29));
    }

    #[test]
    fn missing_delimiters_are_repaired() {
        let table = parse_table();
        assert_eq!(
            table.lookup(TokenKind::Identifier, NonTerminal::StatementListTail),
            Code::Production(27)
        );
        assert_eq!(table.lookup(TokenKind::While, NonTerminal::StatementListTail), Code::Production(27));
        assert_eq!(
            table.lookup(TokenKind::Identifier, NonTerminal::IdentifierListTail),
            Code::Production(3)
        );
        assert_eq!(
            table.lookup(TokenKind::IntConstant, NonTerminal::ExpressionListTail),
            Code::Production(43)
        );
    }

    #[test]
    fn nullable_nonterminals_never_error() {
        let first = first_sets();
        let table = parse_table();
        for nt in NonTerminal::ALL.into_iter().filter(|nt| first.is_nullable(*nt)) {
            for kind in TokenKind::ALL {
                assert!(
                    !matches!(table.lookup(kind, nt), Code::Error(_)),
                    "nullable {nt} errors on {kind}"
                );
            }
        }
    }

    #[test]
    fn error_cells_use_column_messages() {
        let table = parse_table();
        assert_eq!(
            table.lookup(TokenKind::Begin, NonTerminal::Goal),
            Code::Error(NonTerminal::Goal.index())
        );
        assert_eq!(
            table.lookup(TokenKind::Begin, NonTerminal::Program),
            Code::Error(NonTerminal::Goal.index())
        );
        let Code::Error(id) = table.lookup(TokenKind::Semicolon, NonTerminal::Factor) else {
            panic!("expected an error cell");
        };
        assert_eq!(
            error_message(id),
            "An expression must start with an identifier, constant, left paren, or keyword NOT"
        );
    }

    #[test]
    fn unterminated_expression_messages_list_followers() {
        let followers = "Expected an end, then, else, do, operator, semicolon, paren or bracket.";
        for (nt, subject) in [
            (NonTerminal::ExpressionTail, "expression"),
            (NonTerminal::SimpleExpressionTail, "expression"),
            (NonTerminal::TermTail, "term"),
            (NonTerminal::FactorTail, "factor"),
        ] {
            assert_eq!(
                error_message(nt.index()),
                format!("There is no end to this {subject}. {followers}")
            );
        }
    }

    #[test]
    fn render_lists_rows_and_productions() {
        let out = parse_table().render();
        assert!(out.starts_with("PROGRAM"));
        assert!(out.contains("  0: <Goal> ::= <program>"));
        assert!(out.contains(" 33: <else_clause> ::= #29"));
        assert!(out.contains("  4: <identifier_list_tail> ::= e"));
    }

    #[test]
    fn rhs_of_unknown_production_is_empty() {
        assert!(rhs(PRODUCTIONS.len()).is_empty());
        assert_eq!(rhs(0), &[GrammarSymbol::NonTerminal(NonTerminal::Program)]);
    }
}
