//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into tokens on demand for the parser. It handles:
//!
//! - Recognition of keywords, identifiers, literals, and operators
//! - Disambiguation of `.` using the previously returned token
//! - One token of pushback for parser lookahead
//! - Line and column tracking for error reporting

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
