//! Action implementations, one module per concern.
//!
//! - `decls`: program header, variable and parameter declarations, subprogram entry and exit
//! - `expr`: references, assignment, subscripts, arithmetic and comparisons
//! - `control`: IF and WHILE backpatching
//! - `calls`: procedure and function calls, including READ and WRITE

mod calls;
mod control;
mod decls;
mod expr;
