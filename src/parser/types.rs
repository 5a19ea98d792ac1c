use crate::{
    ast::ast::{Node, NodeType},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{parser::Parser, stmt::parse_function};

/// Parses a type annotation: a function type, an array type, a vararg type or a
/// plain name, followed by any number of `*` pointer suffixes.
pub fn parse_type(parser: &mut Parser) -> Result<Node, Error> {
    let mut parsed = match parser.current_token_kind() {
        TokenKind::OpenParen => {
            let function = parse_function(parser)?;
            let token = Token::compiler_created(function.lexeme(), function.token().position.clone());
            Node::unary(token, NodeType::Type, function)
        }
        TokenKind::OpenBracket => parse_array_type(parser)?,
        TokenKind::Vararg => {
            let dots = parser.advance();
            let element = parse_type(parser)?;
            let token = Token::compiler_created(format!("...{}", element.lexeme()), dots.position);
            Node::unary(token, NodeType::Vararg, element)
        }
        TokenKind::Keyword | TokenKind::Identifier => Node::nullary(parser.advance(), NodeType::Type),
        _ => {
            return Err(parser.error_at_current(ErrorImpl::ExpectedType {
                token: parser.describe_current(),
            }))
        }
    };

    while parser.current_token_kind() == TokenKind::Mul {
        let star = parser.advance();
        let token = Token::compiler_created(format!("{}*", parsed.lexeme()), star.position);
        parsed = Node::unary(token, NodeType::Type, parsed);
    }

    Ok(parsed)
}

/// Parses `[int]`, `[int:5]`, `[[char]]` and the like. Every `[` must be closed.
pub fn parse_array_type(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.get_position();

    let mut depth = 0;
    while parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        depth += 1;
    }

    if !matches!(
        parser.current_token_kind(),
        TokenKind::Keyword | TokenKind::Identifier
    ) {
        return Err(parser.error_at_current(ErrorImpl::ExpectedArrayElementType {
            token: parser.describe_current(),
        }));
    }
    let element = Node::nullary(parser.advance(), NodeType::Type);

    let mut length = String::new();
    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();

        if parser.current_token_kind() != TokenKind::Num {
            return Err(parser.error_at_current(ErrorImpl::ExpectedArrayLength {
                token: parser.describe_current(),
            }));
        }
        length = format!(":{}", parser.advance().lexeme);
    }

    let nesting = depth;
    while depth > 0 && parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        depth -= 1;
    }

    if depth != 0 {
        return Err(parser.error_at_current(ErrorImpl::UnbalancedArrayNesting { open: depth }));
    }

    let lexeme = format!(
        "{}{}{}{}",
        "[".repeat(nesting as usize),
        element.lexeme(),
        length,
        "]".repeat(nesting as usize)
    );
    Ok(Node::unary(Token::compiler_created(lexeme, start), NodeType::Type, element))
}
