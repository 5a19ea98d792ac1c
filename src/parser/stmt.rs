use log::debug;

use crate::{
    ast::ast::{Node, NodeType},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    expr::{parse_expr, parse_function_call, parse_struct_field_access},
    parser::Parser,
    types::parse_type,
};

/// Result of parsing something that may or may not be an assignment.
///
/// A field access chain is only an assignment target when `=` follows it.
/// Otherwise the chain is handed back so the expression parser can continue
/// from it without reading it again.
#[derive(Debug)]
pub enum AssignOutcome {
    Assignment(Node),
    Expression(Node),
}

/// Parses `include "path"` followed by the end of the line.
pub fn library_statement(parser: &mut Parser) -> Result<Node, Error> {
    parser.advance();

    if parser.current_token_kind() != TokenKind::String {
        return Err(parser.error_at_current(ErrorImpl::ExpectedIncludePath {
            token: parser.describe_current(),
        }));
    }
    let path = parser.advance();

    match parser.current_token_kind() {
        TokenKind::Newline => {
            parser.advance();
        }
        TokenKind::EOF => {}
        _ => return Err(parser.unexpected("end of include statement")),
    }

    Ok(Node::nullary(path, NodeType::Include))
}

/// Parses one statement and the newline ending it. A statement may also end
/// at a closing `}` or at the end of input.
pub fn parse_terminated_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let statement = parse_stmt(parser)?;

    match parser.current_token_kind() {
        TokenKind::Newline => {
            parser.advance();
        }
        TokenKind::CloseCurly | TokenKind::EOF => {}
        _ => return Err(parser.unexpected("end of statement")),
    }

    Ok(statement)
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Node, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => parse_identifier_stmt(parser),
        TokenKind::Keyword => parse_keyword_stmt(parser),
        TokenKind::Pound => parse_run_directive(parser),
        _ => parse_expr(parser, None),
    }
}

/// Statements starting with a name are told apart by the token after it.
fn parse_identifier_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let next = parser.peek();

    match next.kind {
        TokenKind::Binding => parse_construct(parser),
        TokenKind::Keyword
        | TokenKind::Identifier
        | TokenKind::OpenBracket
        | TokenKind::Vararg => parse_value_dec(parser),
        TokenKind::Assign | TokenKind::FieldAccessor => match parse_assign(parser)? {
            AssignOutcome::Assignment(assignment) => Ok(assignment),
            AssignOutcome::Expression(chain) => parse_expr(parser, Some(chain)),
        },
        TokenKind::OpenParen => {
            let call = parse_function_call(parser)?;
            parse_expr(parser, Some(call))
        }
        _ => parse_expr(parser, None),
    }
}

fn parse_keyword_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let keyword = parser.current_token().lexeme.clone();
    debug!("Parsing '{}' statement on line {}", keyword, parser.current_token().line());

    match keyword.as_str() {
        "ret" => parse_return_stmt(parser),
        "if" => parse_if_stmt(parser),
        "while" => parse_while_stmt(parser),
        "for" => parse_for_stmt(parser),
        "break" | "continue" | "fallthrough" => Ok(Node::nullary(parser.advance(), NodeType::Keyword)),
        _ => Err(parser.error_at_current(ErrorImpl::UnrecognisedStatement { token: keyword })),
    }
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let ret = parser.advance();

    if matches!(
        parser.current_token_kind(),
        TokenKind::Newline | TokenKind::CloseCurly | TokenKind::EOF
    ) {
        return Ok(Node::nullary(ret, NodeType::Keyword));
    }

    let value = parse_expr(parser, None)?;
    let token = Token::compiler_created(format!("ret {}", value.expression_text()), ret.position);
    Ok(Node::unary(token, NodeType::Keyword, value))
}

/// Parses an `if` with its `else if` and `else` branches into one IF block.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let if_token = parser.advance();
    let mut branches = vec![parse_if_branch(parser, "if", if_token.position.clone())?];

    while parser.is_keyword("else") {
        let else_token = parser.advance();

        if parser.is_keyword("if") {
            parser.advance();
            branches.push(parse_if_branch(parser, "else if", else_token.position)?);
        } else if parser.current_token_kind() == TokenKind::OpenCurly {
            let body = parse_body(parser)?;
            let token = Token::compiler_created("else { ... }", else_token.position);
            branches.push(Node::unary(token, NodeType::ElseBranch, body));
            break;
        } else {
            return Err(parser.error_at_current(ErrorImpl::InvalidElseBranch {
                token: parser.describe_current(),
            }));
        }
    }

    Ok(Node::block(if_token, NodeType::If, branches))
}

fn parse_if_branch(parser: &mut Parser, keyword: &str, position: Position) -> Result<Node, Error> {
    let condition = parse_expr(parser, None)?;
    let body = parse_body(parser)?;

    let token = Token::compiler_created(
        format!("{} {} {{ ... }}", keyword, condition.expression_text()),
        position,
    );
    Ok(Node::binary(token, NodeType::IfBranch, condition, body))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let while_token = parser.advance();

    let condition = parse_expr(parser, None)?;
    let body = parse_body(parser)?;

    let token = Token::compiler_created(
        format!("while {} {{ ... }}", condition.expression_text()),
        while_token.position,
    );
    Ok(Node::binary(token, NodeType::While, condition, body))
}

/// Parses `for name in start...end { ... }`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let for_token = parser.advance();

    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.error_at_current(ErrorImpl::ExpectedIdentifier {
            context: String::from("for the loop variable"),
            token: parser.describe_current(),
        }));
    }
    let iterator = Node::nullary(parser.advance(), NodeType::VarDec);

    if !parser.is_keyword("in") {
        return Err(parser.unexpected("'in' after the loop variable"));
    }
    parser.advance();

    let range = parse_range(parser)?;
    let body = parse_body(parser)?;

    let token = Token::compiler_created(
        format!("for {} in {} {{ ... }}", iterator.lexeme(), range.lexeme()),
        for_token.position,
    );
    Ok(Node::trinary(token, NodeType::For, iterator, range, body))
}

/// Parses `start...end`. After a name the `...` lexes as a vararg marker, so
/// both spellings are accepted here.
pub fn parse_range(parser: &mut Parser) -> Result<Node, Error> {
    let start = parse_expr(parser, None)?;

    if !matches!(
        parser.current_token_kind(),
        TokenKind::Range | TokenKind::Vararg
    ) {
        return Err(parser.unexpected("'...' in range"));
    }
    parser.advance();

    let end = parse_expr(parser, None)?;

    let token = Token::compiler_created(
        format!("{}...{}", start.expression_text(), end.expression_text()),
        start.token().position.clone(),
    );
    Ok(Node::binary(token, NodeType::Range, start, end))
}

/// Parses `#run { ... }`.
pub fn parse_run_directive(parser: &mut Parser) -> Result<Node, Error> {
    let pound = parser.advance();

    let current = parser.current_token();
    if current.kind != TokenKind::Identifier || current.lexeme != "run" {
        return Err(parser.error_at_current(ErrorImpl::ExpectedRunKeyword {
            token: parser.describe_current(),
        }));
    }
    parser.advance();

    let body = parse_body(parser)?;
    let token = Token::compiler_created("#run { ... }", pound.position);
    Ok(Node::unary(token, NodeType::RunDirective, body))
}

/// Parses a braced statement list. A broken statement inside the body is
/// recorded and skipped so the rest of the body is still checked.
pub fn parse_body(parser: &mut Parser) -> Result<Node, Error> {
    let open = parser.expect(TokenKind::OpenCurly, "'{'")?;
    let mut statements = vec![];

    loop {
        parser.skip_newlines();

        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::EOF => return Err(parser.unexpected("'}' to close the body")),
            _ => {}
        }

        let depth = parser.depth();
        match parse_terminated_stmt(parser) {
            Ok(statement) => statements.push(statement),
            Err(error) => {
                parser.record(error);
                parser.synchronize(depth);
            }
        }
    }
    parser.advance();

    Ok(Node::block(
        Token::compiler_created("{ ... }", open.position),
        NodeType::Block,
        statements,
    ))
}

/// Parses `name :: struct {...}`, `name :: (params) -> ret ...` or `name :: Type`.
pub fn parse_construct(parser: &mut Parser) -> Result<Node, Error> {
    let name_token = parser.expect(TokenKind::Identifier, "a name")?;
    parser.expect(TokenKind::Binding, "'::'")?;

    let bound = if parser.is_keyword("struct") {
        parse_struct(parser)?
    } else if parser.current_token_kind() == TokenKind::OpenParen {
        parse_function(parser)?
    } else {
        let alias = parse_type(parser)?;
        debug!("Type alias {} :: {}", name_token.lexeme, alias.lexeme());
        alias
    };

    let represents = match bound.represents() {
        NodeType::Struct => NodeType::Struct,
        NodeType::FuncDef => NodeType::FuncDef,
        NodeType::FuncDec => NodeType::FuncDec,
        _ => NodeType::Type,
    };

    let token = Token::compiler_created(
        format!("{} :: {}", name_token.lexeme, bound.lexeme()),
        name_token.position.clone(),
    );
    let name = Node::nullary(name_token, NodeType::Identifier);
    Ok(Node::binary(token, represents, name, bound))
}

pub fn parse_struct(parser: &mut Parser) -> Result<Node, Error> {
    let struct_token = parser.advance();

    parser.expect(TokenKind::OpenCurly, "'{' after struct")?;
    let fields = parse_value_dec_list(parser, TokenKind::CloseCurly)?;
    parser.expect(TokenKind::CloseCurly, "'}' to close the struct")?;

    Ok(Node::unary(struct_token, NodeType::Struct, fields))
}

/// Parses `name Type` entries up to, not including, `closer`. Entries are
/// separated by commas or newlines and may not carry an initial value.
pub fn parse_value_dec_list(parser: &mut Parser, closer: TokenKind) -> Result<Node, Error> {
    let start = parser.get_position();
    let mut entries = vec![];

    parser.skip_newlines();
    while parser.current_token_kind() != closer {
        if parser.current_token_kind() != TokenKind::Identifier {
            return Err(parser.error_at_current(ErrorImpl::ExpectedIdentifier {
                context: String::from("in declaration list"),
                token: parser.describe_current(),
            }));
        }

        let entry = parse_value_dec(parser)?;
        if entry.represents() == NodeType::Assign {
            let name = entry.child(0).map(|name| name.lexeme().to_string()).unwrap_or_default();
            return Err(Error::new(
                ErrorImpl::InitialisedListEntry { name },
                entry.token().position.clone(),
            ));
        }
        entries.push(entry);

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
                parser.skip_newlines();
            }
            TokenKind::Newline => parser.skip_newlines(),
            kind if kind == closer => {}
            _ => return Err(parser.unexpected("',' between declarations")),
        }
    }

    let lexeme = if entries.is_empty() {
        String::from("empty parameter list")
    } else {
        entries
            .iter()
            .map(|entry| entry.lexeme())
            .collect::<Vec<&str>>()
            .join(", ")
    };

    Ok(Node::block(
        Token::compiler_created(lexeme, start),
        NodeType::ParamList,
        entries,
    ))
}

/// Parses `name Type` or `name Type = value`.
pub fn parse_value_dec(parser: &mut Parser) -> Result<Node, Error> {
    let name_token = parser.expect(TokenKind::Identifier, "a name")?;
    let value_type = parse_type(parser)?;
    let declared = format!("{} {}", name_token.lexeme, value_type.lexeme());
    let position = name_token.position.clone();
    let name = Node::nullary(name_token, NodeType::Identifier);

    if parser.current_token_kind() == TokenKind::Assign {
        parser.advance();

        let value = parse_expr(parser, None)?;
        let token = Token::compiler_created(
            format!("{} = {}", declared, value.expression_text()),
            position,
        );
        return Ok(Node::trinary(token, NodeType::Assign, name, value_type, value));
    }

    let represents = if value_type.represents() == NodeType::Vararg {
        NodeType::Vararg
    } else {
        NodeType::VarDec
    };
    Ok(Node::binary(
        Token::compiler_created(declared, position),
        represents,
        name,
        value_type,
    ))
}

/// Parses `target = value`, where the target is a name or a field access chain.
pub fn parse_assign(parser: &mut Parser) -> Result<AssignOutcome, Error> {
    let target = if parser.peek().kind == TokenKind::FieldAccessor {
        let chain = parse_struct_field_access(parser)?;

        if parser.current_token_kind() != TokenKind::Assign {
            debug!("{} is not an assignment target", chain.get_full_lexeme());
            return Ok(AssignOutcome::Expression(chain));
        }
        chain
    } else {
        Node::nullary(
            parser.expect(TokenKind::Identifier, "a name")?,
            NodeType::Identifier,
        )
    };

    parser.expect(TokenKind::Assign, "'=' in assignment")?;
    let value = parse_expr(parser, None)?;

    let token = Token::compiler_created(
        format!("{} = {}", target.get_full_lexeme(), value.expression_text()),
        target.token().position.clone(),
    );
    Ok(AssignOutcome::Assignment(Node::binary(
        token,
        NodeType::Assign,
        target,
        value,
    )))
}

/// Parses `(params) -> ret` with an optional body. With a body this is a
/// FUNCDEF, without one a FUNCDEC.
pub fn parse_function(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenParen, "'('")?;
    let params = parse_value_dec_list(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen, "')' to close the parameter list")?;
    parser.expect(TokenKind::ReturnType, "'->' before the return type")?;

    if parser.current_token_kind() != TokenKind::Keyword {
        return Err(parser.error_at_current(ErrorImpl::MissingReturnType {
            token: parser.describe_current(),
        }));
    }
    let return_type = Node::nullary(parser.advance(), NodeType::Type);

    let param_text = if params.children().is_empty() {
        ""
    } else {
        params.lexeme()
    };
    let signature = format!("({}) -> {}", param_text, return_type.lexeme());
    let position = params.token().position.clone();

    if parser.current_token_kind() == TokenKind::OpenCurly {
        let body = parse_body(parser)?;
        return Ok(Node::trinary(
            Token::compiler_created(signature, position),
            NodeType::FuncDef,
            params,
            return_type,
            body,
        ));
    }

    Ok(Node::binary(
        Token::compiler_created(signature, position),
        NodeType::FuncDec,
        params,
        return_type,
    ))
}
