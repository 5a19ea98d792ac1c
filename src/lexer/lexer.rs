use std::{collections::HashMap, rc::Rc};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{Position, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

lazy_static! {
    static ref IDENTIFIER_PATTERN: Regex = Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap();
    // at most one '.', a trailing '.' is handed back to the range lexer
    static ref NUMBER_PATTERN: Regex = Regex::new("^[0-9]+(\\.[0-9]*)?").unwrap();
    static ref SINGLE_SYMBOLS: HashMap<char, TokenKind> = {
        let mut map = HashMap::new();
        map.insert('(', TokenKind::OpenParen);
        map.insert(')', TokenKind::CloseParen);
        map.insert('*', TokenKind::Mul);
        map.insert('/', TokenKind::Div);
        map.insert('^', TokenKind::Exponent);
        map.insert(',', TokenKind::Comma);
        map.insert('[', TokenKind::OpenBracket);
        map.insert(']', TokenKind::CloseBracket);
        map.insert('{', TokenKind::OpenCurly);
        map.insert('}', TokenKind::CloseCurly);
        map.insert('#', TokenKind::Pound);
        map
    };
}

/// Saved cursor state, restored to hand characters back to the input.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: u32,
    column: u32,
}

/// Pull based tokenizer with one token of pushback.
///
/// The lexer never fails: unrecognised input becomes a `TokenKind::Error` token
/// whose lexeme is the message, and an exhausted input yields `TokenKind::EOF`
/// on every further call.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
    /// The token most recently returned, used for `.` disambiguation and pushback
    last_token: Option<Token>,
    pushed_back: Option<Token>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            file: file_name,
            last_token: None,
            pushed_back: None,
        }
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }

    /// Produces the next token.
    pub fn get_token(&mut self) -> Token {
        if let Some(token) = self.pushed_back.take() {
            return token;
        }

        self.skip_whitespace();
        let start = self.position();

        let token = match self.at() {
            None => MK_TOKEN!(TokenKind::EOF, "eof", start),
            Some('\n') => {
                self.advance();
                MK_TOKEN!(TokenKind::Newline, "\n", start)
            }
            Some(current) => {
                if let Some(token) = self.lex_for_symbols(&start) {
                    token
                } else if let Some(token) = self.lex_for_identifiers(&start) {
                    token
                } else if let Some(token) = self.lex_for_numbers(&start) {
                    token
                } else {
                    self.advance();
                    Token::error(format!("unrecognized symbol `{}`", current), start)
                }
            }
        };

        trace!("{}:{} {}", token.position.line, token.position.column, token);
        self.last_token = Some(token.clone());
        token
    }

    /// Pushes the most recently returned token back, so the next `get_token`
    /// returns it again.
    ///
    /// # Panics
    ///
    /// Pushback is one level deep. Calling this twice without an intervening
    /// `get_token` is a bug in the caller.
    pub fn unget_token(&mut self) {
        assert!(
            self.pushed_back.is_none(),
            "unget_token called twice without an intervening get_token"
        );
        self.pushed_back = self.last_token.clone();
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Token {
        let token = self.get_token();
        self.unget_token();
        token
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.last_token.as_ref().map(|token| token.kind)
    }

    fn at(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(offset)
    }

    fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    fn advance(&mut self) -> Option<char> {
        let current = self.at()?;
        self.pos += current.len_utf8();

        if current == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(current)
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
        self.column = mark.column;
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, Rc::clone(&self.file))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.at(), Some(' ') | Some('\t') | Some('\r')) {
            self.advance();
        }
    }

    fn check_for_string(&mut self, start: &Position) -> Option<Token> {
        if self.at() != Some('"') {
            return None;
        }

        let mut lexeme = String::new();
        lexeme.push('"');
        self.advance();

        loop {
            match self.advance() {
                Some('"') => break,
                Some(c) => lexeme.push(c),
                None => {
                    return Some(Token::error(
                        "unterminated string literal",
                        start.clone(),
                    ))
                }
            }
        }

        lexeme.push('"');
        Some(MK_TOKEN!(TokenKind::String, lexeme, start.clone()))
    }

    /// Emits `target` when the next character is `follow`, otherwise the single
    /// character token, leaving the lookahead unread.
    fn handle_symbol_case(
        &mut self,
        current: char,
        follow: char,
        default_kind: TokenKind,
        target_kind: TokenKind,
        target_lexeme: &str,
        start: &Position,
    ) -> Token {
        if self.at() == Some(follow) {
            self.advance();
            return MK_TOKEN!(target_kind, target_lexeme, start.clone());
        }

        MK_TOKEN!(default_kind, current, start.clone())
    }

    fn lex_for_symbols(&mut self, start: &Position) -> Option<Token> {
        if let Some(token) = self.check_for_string(start) {
            return Some(token);
        }

        let mark = self.mark();
        let current = self.advance()?;

        let token = match current {
            ':' => self.handle_symbol_case(
                ':',
                ':',
                TokenKind::Colon,
                TokenKind::Binding,
                "::",
                start,
            ),
            '-' => match self.at() {
                Some('>') => {
                    self.advance();
                    MK_TOKEN!(TokenKind::ReturnType, "->", start.clone())
                }
                Some('-') => {
                    self.advance();
                    MK_TOKEN!(TokenKind::Decrement, "--", start.clone())
                }
                _ => MK_TOKEN!(TokenKind::Sub, "-", start.clone()),
            },
            '.' => return self.lex_for_dot(mark, start),
            '=' => self.handle_symbol_case(
                '=',
                '=',
                TokenKind::Assign,
                TokenKind::Equality,
                "==",
                start,
            ),
            '+' => self.handle_symbol_case(
                '+',
                '+',
                TokenKind::Add,
                TokenKind::Increment,
                "++",
                start,
            ),
            '>' => self.handle_symbol_case(
                '>',
                '=',
                TokenKind::Gt,
                TokenKind::Gte,
                ">=",
                start,
            ),
            '<' => self.handle_symbol_case(
                '<',
                '=',
                TokenKind::Lt,
                TokenKind::Lte,
                "<=",
                start,
            ),
            '&' => self.handle_symbol_case(
                '&',
                '&',
                TokenKind::BitAnd,
                TokenKind::And,
                "&&",
                start,
            ),
            '|' => self.handle_symbol_case(
                '|',
                '|',
                TokenKind::BitOr,
                TokenKind::Or,
                "||",
                start,
            ),
            _ => match SINGLE_SYMBOLS.get(&current) {
                Some(kind) => MK_TOKEN!(*kind, current, start.clone()),
                None => {
                    self.reset(mark);
                    return None;
                }
            },
        };

        Some(token)
    }

    /// `.` has already been consumed. Which token it starts depends on the token
    /// returned before it.
    fn lex_for_dot(&mut self, mark: Mark, start: &Position) -> Option<Token> {
        let after_identifier = self.last_kind() == Some(TokenKind::Identifier);

        match self.at() {
            Some(c) if after_identifier && (c.is_ascii_alphabetic() || c == '_') => {
                Some(MK_TOKEN!(TokenKind::FieldAccessor, ".", start.clone()))
            }
            Some('.') if self.peek_char(1) == Some('.') => {
                self.advance_n(2);
                // `args ...int` is a variadic parameter, `1...5` a range
                let kind = if after_identifier {
                    TokenKind::Vararg
                } else {
                    TokenKind::Range
                };
                Some(MK_TOKEN!(kind, "...", start.clone()))
            }
            _ => {
                self.reset(mark);
                None
            }
        }
    }

    fn lex_for_numbers(&mut self, start: &Position) -> Option<Token> {
        let matched = NUMBER_PATTERN.find(self.remainder())?.as_str().to_string();

        let (kind, lexeme) = if let Some(integer) = matched.strip_suffix('.') {
            // `5...10`: the '.' belongs to the range operator
            (TokenKind::Num, integer.to_string())
        } else if matched.contains('.') {
            (TokenKind::Float, matched)
        } else {
            (TokenKind::Num, matched)
        };

        self.advance_n(lexeme.chars().count());
        Some(MK_TOKEN!(kind, lexeme, start.clone()))
    }

    fn lex_for_identifiers(&mut self, start: &Position) -> Option<Token> {
        let value = IDENTIFIER_PATTERN.find(self.remainder())?.as_str().to_string();
        self.advance_n(value.len());

        let kind = if RESERVED_LOOKUP.contains(value.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Some(MK_TOKEN!(kind, value, start.clone()))
    }
}

/// Drains a source completely, including the final `EOF` token.
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.get_token();
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            break;
        }
    }

    tokens
}

/// One `[index] KIND 'lexeme'` line per token, the lexer-only debug output.
pub fn dump_tokens(source: String, file: Option<String>) -> Vec<String> {
    tokenize(source, file)
        .iter()
        .enumerate()
        .map(|(index, token)| format!("[{}] {}", index, token))
        .collect()
}
