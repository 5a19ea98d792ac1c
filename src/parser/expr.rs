use log::debug;

use crate::{
    ast::ast::{Node, NodeType},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Associativity, Token, TokenKind},
};

use super::parser::Parser;

/// Parses an expression.
///
/// `rescued` is a left operand the caller already parsed, e.g. a field access
/// chain that turned out not to be an assignment target. When present, operator
/// precedence climbing resumes from it instead of reading a new primary.
pub fn parse_expr(parser: &mut Parser, rescued: Option<Node>) -> Result<Node, Error> {
    let left = match rescued {
        Some(node) => {
            debug!("Resuming expression from {}", node.get_full_lexeme());
            node
        }
        None => parse_primary(parser)?,
    };

    parse_operator(parser, left, 0)
}

/// Precedence climbing over binary operators.
///
/// Folds every operator binding at least as tightly as `min_precedence` into
/// `left`. A following operator of higher precedence, or of the same precedence
/// when right associative, takes the current right operand as its own left.
pub fn parse_operator(
    parser: &mut Parser,
    mut left: Node,
    min_precedence: u8,
) -> Result<Node, Error> {
    while let Some(precedence) = operator_precedence(parser) {
        if precedence < min_precedence {
            break;
        }

        let operator = parser.advance();
        let mut right = parse_primary(parser)?;

        while let Some(next_precedence) = operator_precedence(parser) {
            let next_associativity = parser.current_token_kind().associativity();

            if next_precedence > precedence {
                right = parse_operator(parser, right, precedence + 1)?;
            } else if next_precedence == precedence
                && next_associativity == Some(Associativity::Right)
            {
                right = parse_operator(parser, right, precedence)?;
            } else {
                break;
            }
        }

        left = Node::binary(operator, NodeType::Binary, left, right);
    }

    Ok(left)
}

/// Precedence of the current token when it is a binary operator.
fn operator_precedence(parser: &Parser) -> Option<u8> {
    let kind = parser.current_token_kind();
    if !kind.is_operator() {
        return None;
    }

    kind.precedence()
}

pub fn parse_primary(parser: &mut Parser) -> Result<Node, Error> {
    match parser.current_token_kind() {
        TokenKind::Num => Ok(Node::nullary(parser.advance(), NodeType::Number)),
        TokenKind::Float => Ok(Node::nullary(parser.advance(), NodeType::Float)),
        TokenKind::String => Ok(Node::nullary(parser.advance(), NodeType::String)),
        TokenKind::Identifier => match parser.peek().kind {
            TokenKind::FieldAccessor => parse_struct_field_access(parser),
            TokenKind::OpenParen => parse_function_call(parser),
            _ => Ok(Node::nullary(parser.advance(), NodeType::VarRef)),
        },
        TokenKind::OpenParen => {
            parser.advance();
            let inner = parse_expr(parser, None)?;
            parser.expect(TokenKind::CloseParen, "')' to close the expression")?;
            Ok(inner)
        }
        _ => Err(parser.error_at_current(ErrorImpl::ExpectedPrimary {
            token: parser.describe_current(),
        })),
    }
}

/// Parses `a.b.c` into a LIST node whose child is the head reference.
pub fn parse_struct_field_access(parser: &mut Parser) -> Result<Node, Error> {
    let head_token = parser.expect(TokenKind::Identifier, "a name")?;
    let mut lexemes = vec![head_token.lexeme.clone()];

    while parser.current_token_kind() == TokenKind::FieldAccessor {
        parser.advance();

        if parser.current_token_kind() != TokenKind::Identifier {
            return Err(parser.error_at_current(ErrorImpl::ExpectedIdentifier {
                context: String::from("after '.' in field access"),
                token: parser.describe_current(),
            }));
        }

        lexemes.push(parser.advance().lexeme);
    }

    let head = Node::nullary(head_token.clone(), NodeType::VarRef);
    Ok(Node::path(head_token, head, lexemes))
}

/// Parses `name(arg, ...)`. The arguments are kept, in order, in a BLOCK child.
pub fn parse_function_call(parser: &mut Parser) -> Result<Node, Error> {
    let name = parser.expect(TokenKind::Identifier, "a function name")?;
    let open = parser.expect(TokenKind::OpenParen, "'('")?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, None)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen, "')' to close the argument list")?;

    let arguments = Node::block(
        Token::compiler_created("arguments", open.position),
        NodeType::Block,
        arguments,
    );
    Ok(Node::unary(name, NodeType::FuncCall, arguments))
}
