//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics produced while tokenizing and
//! parsing. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexical, syntactic and structural failures
//! - Error formatting and helpful suggestions

pub mod errors;
