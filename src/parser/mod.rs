//! Parser module for building the parse tree.
//!
//! This module contains the parser that turns the lexer's token stream into a
//! tree of [`Node`](crate::ast::ast::Node)s rooted at a PROGRAM block. It is a
//! recursive descent parser with one token of lookahead plus a peek, and uses
//! precedence climbing for binary operators. It handles:
//!
//! - Include statements and general statements
//! - Constructs (`name :: ...`): structs, functions and type aliases
//! - Value declarations, assignments and function calls
//! - Control flow (`if`/`else`, `while`, `for`) and `#run` directives
//! - Type annotations
//! - Error recording and recovery
//!
//! Sub-parsers return `Result`; the statement loops record failures and skip to
//! the next statement so every diagnostic in a file is reported at once.

pub mod expr;
pub mod parser;
pub mod stmt;
pub mod types;
