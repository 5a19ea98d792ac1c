//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals and their interaction with `...`
//! - `.` disambiguation (field access, range, vararg)
//! - Operators and punctuation
//! - Pushback and end of input
//! - Error tokens

use super::{
    lexer::{dump_tokens, tokenize, Lexer},
    tokens::{Associativity, TokenKind},
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.sage".to_string()))
        .iter()
        .map(|token| token.kind)
        .collect()
}

fn single(source: &str) -> (TokenKind, String) {
    let tokens = tokenize(source.to_string(), Some("test.sage".to_string()));
    assert_eq!(tokens.len(), 2, "expected one token before EOF in {:?}", source);
    assert_eq!(tokens[1].kind, TokenKind::EOF);
    (tokens[0].kind, tokens[0].lexeme.clone())
}

#[test]
fn test_tokenize_keywords() {
    let source = "int char void i16 i32 i64 f32 f64 bool include for while in if else break continue fallthrough ret struct using execute";
    let tokens = tokenize(source.to_string(), None);

    assert_eq!(tokens.len(), 23);
    for token in &tokens[..22] {
        assert_eq!(token.kind, TokenKind::Keyword, "{}", token.lexeme);
    }
    assert_eq!(tokens[18].lexeme, "ret");
    assert_eq!(tokens[22].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _underscore CamelCase structure".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme, "foo");
    assert_eq!(tokens[1].lexeme, "baz_123");
    assert_eq!(tokens[2].lexeme, "_underscore");
    assert_eq!(tokens[3].lexeme, "CamelCase");
    // keyword prefix does not make a keyword
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_single_token_kinds() {
    let cases = [
        ("==", TokenKind::Equality),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        (">=", TokenKind::Gte),
        ("<=", TokenKind::Lte),
        ("+", TokenKind::Add),
        ("-", TokenKind::Sub),
        ("*", TokenKind::Mul),
        ("/", TokenKind::Div),
        ("^", TokenKind::Exponent),
        ("42", TokenKind::Num),
        ("4.2", TokenKind::Float),
        ("\"hi\"", TokenKind::String),
        ("name", TokenKind::Identifier),
        ("while", TokenKind::Keyword),
        ("=", TokenKind::Assign),
        ("(", TokenKind::OpenParen),
        (")", TokenKind::CloseParen),
        ("{", TokenKind::OpenCurly),
        ("}", TokenKind::CloseCurly),
        ("[", TokenKind::OpenBracket),
        ("]", TokenKind::CloseBracket),
        (",", TokenKind::Comma),
        (":", TokenKind::Colon),
        ("#", TokenKind::Pound),
        ("::", TokenKind::Binding),
        ("->", TokenKind::ReturnType),
        ("++", TokenKind::Increment),
        ("--", TokenKind::Decrement),
        ("&&", TokenKind::And),
        ("||", TokenKind::Or),
        ("&", TokenKind::BitAnd),
        ("|", TokenKind::BitOr),
        ("...", TokenKind::Range),
    ];

    for (source, kind) in cases {
        let (lexed_kind, lexeme) = single(source);
        assert_eq!(lexed_kind, kind, "kind of {:?}", source);
        assert_eq!(lexeme, source, "lexeme of {:?}", source);
    }
}

#[test]
fn test_newline_token_and_line_numbers() {
    let tokens = tokenize("a\n  b\n\nc".to_string(), None);

    assert_eq!(tokens[0].lexeme, "a");
    assert_eq!(tokens[0].position.line, 1);
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].lexeme, "b");
    assert_eq!(tokens[2].position.line, 2);
    assert_eq!(tokens[2].position.column, 3);
    assert_eq!(tokens[3].kind, TokenKind::Newline);
    assert_eq!(tokens[4].kind, TokenKind::Newline);
    assert_eq!(tokens[5].lexeme, "c");
    assert_eq!(tokens[5].position.line, 4);
    assert_eq!(tokens[5].position.column, 1);
}

#[test]
fn test_string_keeps_quotes_and_raw_contents() {
    let (kind, lexeme) = single(r#""hello \n world""#);

    assert_eq!(kind, TokenKind::String);
    assert_eq!(lexeme, r#""hello \n world""#);
}

#[test]
fn test_unterminated_string_is_error_token() {
    let tokens = tokenize("\"never closed".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].lexeme, "unterminated string literal");
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_field_accessor_after_identifier() {
    let tokens = tokenize("a.b".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::FieldAccessor);
    assert_eq!(tokens[1].lexeme, ".");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].lexeme, "b");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_float_literal() {
    let (kind, lexeme) = single("5.5");

    assert_eq!(kind, TokenKind::Float);
    assert_eq!(lexeme, "5.5");
}

#[test]
fn test_number_before_range_is_integer() {
    let tokens = tokenize("5...10".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::Num);
    assert_eq!(tokens[0].lexeme, "5");
    assert_eq!(tokens[1].kind, TokenKind::Range);
    assert_eq!(tokens[1].lexeme, "...");
    assert_eq!(tokens[2].kind, TokenKind::Num);
    assert_eq!(tokens[2].lexeme, "10");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_vararg_after_identifier() {
    assert_eq!(
        kinds("args ...int"),
        vec![
            TokenKind::Identifier,
            TokenKind::Vararg,
            TokenKind::Keyword,
            TokenKind::EOF
        ]
    );
    assert_eq!(
        kinds("name..."),
        vec![TokenKind::Identifier, TokenKind::Vararg, TokenKind::EOF]
    );
    assert_eq!(
        kinds("1...5"),
        vec![TokenKind::Num, TokenKind::Range, TokenKind::Num, TokenKind::EOF]
    );
}

#[test]
fn test_lone_dot_is_error() {
    let tokens = tokenize("5 .x".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::Num);
    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn test_doubled_symbols_push_back_lookahead() {
    assert_eq!(
        kinds("a=b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::Identifier,
            TokenKind::EOF
        ]
    );
    assert_eq!(
        kinds("1<2"),
        vec![TokenKind::Num, TokenKind::Lt, TokenKind::Num, TokenKind::EOF]
    );
    assert_eq!(
        kinds("x-1"),
        vec![TokenKind::Identifier, TokenKind::Sub, TokenKind::Num, TokenKind::EOF]
    );
    assert_eq!(
        kinds("f :: (a int) -> int"),
        vec![
            TokenKind::Identifier,
            TokenKind::Binding,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::CloseParen,
            TokenKind::ReturnType,
            TokenKind::Keyword,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_array_type_with_length() {
    assert_eq!(
        kinds("[int:5]"),
        vec![
            TokenKind::OpenBracket,
            TokenKind::Keyword,
            TokenKind::Colon,
            TokenKind::Num,
            TokenKind::CloseBracket,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_unrecognized_symbol_is_error_token() {
    let tokens = tokenize("x @ y".to_string(), None);

    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].lexeme, "unrecognized symbol `@`");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("x".to_string(), None);

    assert_eq!(lexer.get_token().kind, TokenKind::Identifier);
    assert_eq!(lexer.get_token().kind, TokenKind::EOF);
    assert_eq!(lexer.get_token().kind, TokenKind::EOF);
    assert_eq!(lexer.get_token().kind, TokenKind::EOF);
}

#[test]
fn test_unget_returns_same_token() {
    let mut lexer = Lexer::new("alpha beta".to_string(), None);

    let first = lexer.get_token();
    lexer.unget_token();
    assert_eq!(lexer.get_token(), first);

    let peeked = lexer.peek_token();
    assert_eq!(peeked.lexeme, "beta");
    assert_eq!(lexer.get_token(), peeked);
    assert_eq!(lexer.get_token().kind, TokenKind::EOF);
}

#[test]
#[should_panic(expected = "unget_token called twice")]
fn test_double_unget_panics() {
    let mut lexer = Lexer::new("alpha beta".to_string(), None);

    lexer.get_token();
    lexer.unget_token();
    lexer.unget_token();
}

#[test]
fn test_operator_table() {
    let operators = [
        (TokenKind::Equality, 0),
        (TokenKind::Lt, 1),
        (TokenKind::Gt, 1),
        (TokenKind::Gte, 2),
        (TokenKind::Lte, 2),
        (TokenKind::Add, 3),
        (TokenKind::Sub, 3),
        (TokenKind::Mul, 4),
        (TokenKind::Div, 4),
        (TokenKind::Exponent, 5),
    ];

    for (kind, rank) in operators {
        assert!(kind.is_operator());
        assert_eq!(kind.precedence(), Some(rank));
    }

    for kind in [TokenKind::Num, TokenKind::Assign, TokenKind::And, TokenKind::Range] {
        assert!(!kind.is_operator());
        assert!(kind.precedence() < Some(0));
    }
}

#[test]
fn test_comparisons_are_right_associative() {
    for kind in [
        TokenKind::Mul,
        TokenKind::Div,
        TokenKind::Sub,
        TokenKind::Add,
        TokenKind::Equality,
    ] {
        assert_eq!(kind.associativity(), Some(Associativity::Left), "{}", kind);
    }
    for kind in [
        TokenKind::Lt,
        TokenKind::Gt,
        TokenKind::Lte,
        TokenKind::Gte,
        TokenKind::Exponent,
    ] {
        assert_eq!(kind.associativity(), Some(Associativity::Right), "{}", kind);
    }
    for kind in [TokenKind::And, TokenKind::Or, TokenKind::Assign] {
        assert_eq!(kind.associativity(), None, "{}", kind);
    }

    for token in tokenize("== < > >= <= + - * / ^".to_string(), None) {
        if token.kind.is_operator() {
            assert_eq!(
                token.is_left_associative(),
                token.kind.associativity() == Some(Associativity::Left),
                "{}",
                token.lexeme
            );
        }
    }
}

#[test]
fn test_dump_tokens() {
    let lines = dump_tokens("x <= 1\n".to_string(), None);

    assert_eq!(
        lines,
        vec![
            "[0] TT_IDENT 'x'",
            "[1] TT_LTE '<='",
            "[2] TT_NUM '1'",
            "[3] TT_NEWLINE '\\n'",
            "[4] TT_EOF 'eof'",
        ]
    );
}
