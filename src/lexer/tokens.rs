use lazy_static::lazy_static;
use std::{collections::HashSet, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("int");
        set.insert("char");
        set.insert("void");
        set.insert("i16");
        set.insert("i32");
        set.insert("i64");
        set.insert("f32");
        set.insert("f64");
        set.insert("bool");
        set.insert("include");
        set.insert("for");
        set.insert("while");
        set.insert("in");
        set.insert("if");
        set.insert("else");
        set.insert("break");
        set.insert("continue");
        set.insert("fallthrough");
        set.insert("ret");
        set.insert("struct");
        set.insert("using");
        set.insert("execute");
        set
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Operators
    Equality,
    Lt,
    Gt,
    Gte,
    Lte,
    Add,
    Sub,
    Mul,
    Div,
    Exponent,

    Num,
    Float,
    String,
    Identifier,
    Keyword,

    Newline,
    Assign,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon, // array length, `ages [int:5]`
    Pound,

    Binding,       // ::
    ReturnType,    // ->
    Increment,     // ++
    Decrement,     // --
    And,           // &&
    Or,            // ||
    BitAnd,        // &
    BitOr,         // |
    Range,         // 1...5
    Vararg,        // args ...int
    FieldAccessor, // point.x

    CompilerCreated,
    Error,
    EOF,
}

/// Operator associativity used by the precedence climbing parser.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Associativity {
    Left,
    Right,
}

impl TokenKind {
    /// Whether the kind is a binary operator the expression parser folds.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Equality
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Gte
                | TokenKind::Lte
                | TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Exponent
        )
    }

    /// Binding rank of an operator. `None` for every non-operator, which orders
    /// below every `Some` rank.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            TokenKind::Equality => Some(0),
            TokenKind::Lt | TokenKind::Gt => Some(1),
            TokenKind::Gte | TokenKind::Lte => Some(2),
            TokenKind::Add | TokenKind::Sub => Some(3),
            TokenKind::Mul | TokenKind::Div => Some(4),
            TokenKind::Exponent => Some(5),
            _ => None,
        }
    }

    /// Associativity of an operator kind, `None` for non-operators.
    ///
    /// Only `*`, `/`, `-`, `+` and `==` fold to the left. The comparisons and `^`
    /// are right associative, which the parser tests pin down.
    pub fn associativity(&self) -> Option<Associativity> {
        match self {
            TokenKind::Equality
            | TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::Div => Some(Associativity::Left),
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Gte
            | TokenKind::Lte
            | TokenKind::Exponent => Some(Associativity::Right),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Equality => "TT_EQUALITY",
            TokenKind::Lt => "TT_LT",
            TokenKind::Gt => "TT_GT",
            TokenKind::Gte => "TT_GTE",
            TokenKind::Lte => "TT_LTE",
            TokenKind::Add => "TT_ADD",
            TokenKind::Sub => "TT_SUB",
            TokenKind::Mul => "TT_MUL",
            TokenKind::Div => "TT_DIV",
            TokenKind::Exponent => "TT_EXP",
            TokenKind::Num => "TT_NUM",
            TokenKind::Float => "TT_FLOAT",
            TokenKind::String => "TT_STRING",
            TokenKind::Identifier => "TT_IDENT",
            TokenKind::Keyword => "TT_KEYWORD",
            TokenKind::Newline => "TT_NEWLINE",
            TokenKind::Assign => "TT_ASSIGN",
            TokenKind::OpenParen => "TT_LPAREN",
            TokenKind::CloseParen => "TT_RPAREN",
            TokenKind::OpenCurly => "TT_LBRACE",
            TokenKind::CloseCurly => "TT_RBRACE",
            TokenKind::OpenBracket => "TT_LBRACKET",
            TokenKind::CloseBracket => "TT_RBRACKET",
            TokenKind::Comma => "TT_COMMA",
            TokenKind::Colon => "TT_COLON",
            TokenKind::Pound => "TT_POUND",
            TokenKind::Binding => "TT_BINDING",
            TokenKind::ReturnType => "TT_FUNC_RETURN_TYPE",
            TokenKind::Increment => "TT_INCREMENT",
            TokenKind::Decrement => "TT_DECREMENT",
            TokenKind::And => "TT_AND",
            TokenKind::Or => "TT_OR",
            TokenKind::BitAnd => "TT_BIT_AND",
            TokenKind::BitOr => "TT_BIT_OR",
            TokenKind::Range => "TT_RANGE",
            TokenKind::Vararg => "TT_VARARG",
            TokenKind::FieldAccessor => "TT_FIELD_ACCESSOR",
            TokenKind::CompilerCreated => "TT_COMPILER_CREATED",
            TokenKind::Error => "TT_ERROR",
            TokenKind::EOF => "TT_EOF",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "{} '\\n'", self.kind),
            _ => write!(f, "{} '{}'", self.kind, self.lexeme),
        }
    }
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// An error token; the lexeme carries the message.
    pub fn error(message: impl Into<String>, position: Position) -> Self {
        Token::new(TokenKind::Error, message, position)
    }

    /// A token the parser invents to label a composite node.
    pub fn compiler_created(lexeme: impl Into<String>, position: Position) -> Self {
        Token::new(TokenKind::CompilerCreated, lexeme, position)
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn precedence(&self) -> Option<u8> {
        self.kind.precedence()
    }

    pub fn is_left_associative(&self) -> bool {
        self.kind.associativity() == Some(Associativity::Left)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == keyword
    }
}
