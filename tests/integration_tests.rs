//! Integration tests for the sage front end.
//!
//! These tests run whole `.sage` files from `tests/fixtures` through the lexer
//! and parser, and drive the `sagec` binary end to end.

use std::{fs::read_to_string, path::PathBuf, process::Command};

use sagec::{
    ast::ast::{NodeShape, NodeType},
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    read_to_string(fixture_path(name)).expect("fixture should be readable")
}

#[test]
fn test_parse_full_program() {
    let program = parse(fixture("program.sage"), Some("program.sage".to_string()))
        .expect("program.sage should parse");

    let kinds: Vec<NodeType> = program.children().iter().map(|node| node.represents()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeType::Include,
            NodeType::Include,
            NodeType::Struct,
            NodeType::Type,
            NodeType::FuncDec,
            NodeType::FuncDef,
            NodeType::FuncDef,
            NodeType::RunDirective,
        ]
    );

    let main = program.child(6).and_then(|construct| construct.child(1)).expect("main");
    let body = main.child(2).expect("main body");
    let statements: Vec<NodeType> = body.children().iter().map(|node| node.represents()).collect();
    assert_eq!(
        statements,
        vec![
            NodeType::VarDec,
            NodeType::Assign,
            NodeType::Assign,
            NodeType::For,
            NodeType::While,
            NodeType::FuncCall,
            NodeType::Keyword,
        ]
    );

    let for_body = body.child(3).and_then(|looping| looping.child(2)).expect("for body");
    let branching = for_body.get_child_node().expect("if");
    assert_eq!(branching.represents(), NodeType::If);
    assert_eq!(branching.children().len(), 3);
}

#[test]
fn test_tree_dump_is_indented() {
    let program = parse("x = 1 + 2\n".to_string(), None).expect("should parse");

    assert_eq!(
        program.show_tree(),
        "- PROGRAM 'program'\n  - ASSIGN 'x = 1 + 2'\n    - IDENTIFIER 'x'\n    - BINARY '+'\n      - NUMBER '1'\n      - NUMBER '2'\n"
    );
}

#[test]
fn test_expression_fixture() {
    let program = parse(fixture("expressions.sage"), None).expect("expressions.sage should parse");

    let texts: Vec<String> = program
        .children()
        .iter()
        .map(|node| node.expression_text())
        .collect();
    assert_eq!(
        texts,
        vec![
            "1 + (2 * 3)",
            "(1 - 2) - 3",
            "a < (b < c)",
            "(1 + 2) ^ 2",
            "p.q.r / 4",
        ]
    );
    assert!(program
        .children()
        .iter()
        .all(|node| node.shape() == NodeShape::Binary));
}

#[test]
fn test_error_fixture_reports_every_error() {
    let errors = parse(fixture("errors.sage"), Some("errors.sage".to_string()))
        .expect_err("errors.sage should fail");

    let reported: Vec<(String, u32)> = errors
        .iter()
        .map(|error| (error.get_error_name().to_string(), error.line()))
        .collect();
    assert_eq!(
        reported,
        vec![
            ("ExpectedPrimary".to_string(), 4),
            ("InitialisedListEntry".to_string(), 10),
        ]
    );
}

#[test]
fn test_tokenize_fixture_positions() {
    let tokens = tokenize(fixture("program.sage"), Some("program.sage".to_string()));

    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::EOF));
    assert!(tokens.iter().all(|token| token.kind != TokenKind::Error));

    let struct_keyword = tokens
        .iter()
        .find(|token| token.is_keyword("struct"))
        .expect("struct keyword");
    assert_eq!(struct_keyword.position.line, 4);
    assert_eq!(struct_keyword.position.column, 10);
}

#[test]
fn test_cli_rejects_other_extensions() {
    let output = Command::new(env!("CARGO_BIN_EXE_sagec"))
        .arg("Cargo.toml")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("sagec should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot target non sage source files."));
}

#[test]
fn test_cli_reports_diagnostics() {
    let output = Command::new(env!("CARGO_BIN_EXE_sagec"))
        .arg(fixture_path("errors.sage"))
        .output()
        .expect("sagec should run");

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: ExpectedPrimary"));
    assert!(stderr.contains("4 | count = )"));
    assert!(stderr.contains("2 error(s) found"));
}

#[test]
fn test_cli_tree_and_tokens() {
    let output = Command::new(env!("CARGO_BIN_EXE_sagec"))
        .arg(fixture_path("expressions.sage"))
        .arg("--tree")
        .output()
        .expect("sagec should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("- PROGRAM 'program'\n"));

    let output = Command::new(env!("CARGO_BIN_EXE_sagec"))
        .arg(fixture_path("expressions.sage"))
        .arg("--tokens")
        .output()
        .expect("sagec should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("[0] TT_NUM '1'\n[1] TT_ADD '+'\n"));
}
