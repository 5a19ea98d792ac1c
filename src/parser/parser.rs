//! Parser implementation for building the parse tree.
//!
//! This module contains the main Parser struct, its token handling utilities
//! and the program level entry points. The parser pulls tokens lazily from the
//! lexer, keeping exactly one token of lookahead in `current` and using the
//! lexer's pushback for a second one (`peek`).
//!
//! Failure is reported through `Result`: a sub-parser that meets an unexpected
//! token returns an `Error` and its callers propagate it with `?` up to the
//! nearest statement loop, which records the diagnostic, resynchronises and
//! carries on so later errors are reported too.

use std::rc::Rc;

use log::{debug, info};

use crate::{
    ast::ast::{Node, NodeType},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::stmt::{library_statement, parse_terminated_stmt};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// Token source, pulled on demand
    lexer: Lexer,
    /// The lookahead token
    current: Token,
    /// Diagnostics recorded so far
    errors: Vec<Error>,
    /// `{` and `(` consumed and not yet closed, innermost last
    delimiters: Vec<TokenKind>,
    /// The name of the source file being parsed
    file: Rc<String>,
}

impl Parser {
    /// Creates a new Parser over `source` and reads the first token.
    pub fn new(source: String, file: Option<String>) -> Self {
        let mut lexer = Lexer::new(source, file);
        let file = lexer.file();
        let current = lexer.get_token();

        info!("Parser created for {}", file);

        Parser {
            lexer,
            current,
            errors: vec![],
            delimiters: vec![],
            file,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        match self.current.kind {
            TokenKind::OpenCurly | TokenKind::OpenParen => {
                self.delimiters.push(self.current.kind)
            }
            TokenKind::CloseParen => {
                if self.delimiters.last() == Some(&TokenKind::OpenParen) {
                    self.delimiters.pop();
                }
            }
            // `}` also closes any `(` left open inside its body
            TokenKind::CloseCurly => {
                while let Some(open) = self.delimiters.pop() {
                    if open == TokenKind::OpenCurly {
                        break;
                    }
                }
            }
            _ => {}
        }

        let next = self.lexer.get_token();
        std::mem::replace(&mut self.current, next)
    }

    /// Returns the token after the current one without consuming anything.
    pub fn peek(&mut self) -> Token {
        self.lexer.peek_token()
    }

    /// Expects a token of the specified kind and advances past it.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `expected` - What the caller was looking for, used in the diagnostic
    pub fn expect(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        if self.current.kind != expected_kind {
            return Err(self.unexpected(expected));
        }

        Ok(self.advance())
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.current.is_keyword(keyword)
    }

    pub fn skip_newlines(&mut self) {
        while self.current.kind == TokenKind::Newline {
            self.advance();
        }
    }

    /// Builds a diagnostic located at the current token. An error token from the
    /// lexer always wins, since it explains the failure better.
    pub fn error_at_current(&self, error_impl: ErrorImpl) -> Error {
        if self.current.kind == TokenKind::Error {
            return Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: self.current.lexeme.clone(),
                },
                self.get_position(),
            );
        }

        Error::new(error_impl, self.get_position())
    }

    pub fn unexpected(&self, expected: &str) -> Error {
        self.error_at_current(ErrorImpl::UnexpectedToken {
            token: self.describe_current(),
            expected: expected.to_string(),
        })
    }

    /// Human readable text of the current token for diagnostics.
    pub fn describe_current(&self) -> String {
        match self.current.kind {
            TokenKind::Newline => String::from("newline"),
            TokenKind::EOF => String::from("end of input"),
            _ => self.current.lexeme.clone(),
        }
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.position.clone()
    }

    pub fn record(&mut self, error: Error) {
        debug!("Recorded diagnostic {}", error);
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Delimiter nesting at the current token.
    pub fn depth(&self) -> usize {
        self.delimiters.len()
    }

    /// Whether the current `}` closes a `{` opened at or after nesting `depth`.
    fn closes_within(&self, depth: usize) -> bool {
        self.delimiters
            .iter()
            .rposition(|open| *open == TokenKind::OpenCurly)
            .is_some_and(|index| index >= depth)
    }

    /// Skips the rest of a broken statement that began at delimiter nesting
    /// `depth`. Everything opened inside the statement is skipped with it, up to
    /// and including the next newline back at that nesting. A `}` that closes a
    /// body opened before the statement is left for the caller.
    pub fn synchronize(&mut self, depth: usize) {
        debug!(
            "Resynchronising from line {} to depth {}",
            self.current.line(),
            depth
        );

        loop {
            match self.current.kind {
                TokenKind::EOF => return,
                TokenKind::Newline if self.depth() <= depth => {
                    self.advance();
                    return;
                }
                TokenKind::CloseCurly if !self.closes_within(depth) => return,
                _ => {}
            }

            self.advance();
        }
    }

    /// Parses a whole source file.
    ///
    /// Include statements come first, then general statements; both land, in
    /// order, under one `PROGRAM` block. If any diagnostic was recorded the tree
    /// is dropped and every diagnostic is returned instead.
    pub fn parse_program(&mut self) -> Result<Node, Vec<Error>> {
        info!("Beginning parse of {}", self.file);

        let root_token = Token::compiler_created("program", Position::new(1, 1, Rc::clone(&self.file)));

        let mut children = parse_libraries(self);
        children.extend(parse_statements(self));

        if !self.errors.is_empty() {
            info!("Parse of {} failed with {} diagnostic(s)", self.file, self.errors.len());
            return Err(std::mem::take(&mut self.errors));
        }

        info!("Parsed {} top level node(s) from {}", children.len(), self.file);
        Ok(Node::block(root_token, NodeType::Program, children))
    }
}

/// Parses the leading run of `include` statements.
pub fn parse_libraries(parser: &mut Parser) -> Vec<Node> {
    let mut includes = vec![];

    loop {
        parser.skip_newlines();
        if !parser.is_keyword("include") {
            break;
        }

        let depth = parser.depth();
        match library_statement(parser) {
            Ok(include) => includes.push(include),
            Err(error) => {
                parser.record(error);
                parser.synchronize(depth);
            }
        }
    }

    includes
}

/// Parses general statements until the end of input.
pub fn parse_statements(parser: &mut Parser) -> Vec<Node> {
    let mut statements = vec![];

    loop {
        parser.skip_newlines();

        match parser.current_token_kind() {
            TokenKind::EOF => break,
            TokenKind::CloseCurly => {
                let error = parser.unexpected("a statement");
                parser.record(error);
                parser.advance();
                continue;
            }
            _ => {}
        }

        let depth = parser.depth();
        match parse_terminated_stmt(parser) {
            Ok(statement) => statements.push(statement),
            Err(error) => {
                parser.record(error);
                parser.synchronize(depth);

                // a stray `}` ends the broken statement, it has no body to close
                if parser.current_token_kind() == TokenKind::CloseCurly {
                    parser.advance();
                }
            }
        }
    }

    statements
}

/// Parses source text into a parse tree.
///
/// This is the main entry point for parsing. It creates a parser instance and
/// parses the whole program.
///
/// # Returns
///
/// The `PROGRAM` root, or every diagnostic recorded while parsing.
pub fn parse(source: String, file: Option<String>) -> Result<Node, Vec<Error>> {
    let mut parser = Parser::new(source, file);
    parser.parse_program()
}
