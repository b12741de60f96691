//! Static grammar data: symbols, the production list, and the derived LL(1) parse table.

pub mod productions;
pub mod symbols;
pub mod table;

pub use productions::{PRODUCTIONS, Production};
pub use symbols::{ActionId, GrammarSymbol, NonTerminal};
pub use table::{Code, ParseTable, error_message, parse_table, rhs};
