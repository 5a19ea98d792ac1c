/// AST (Abstract Syntax Tree) module
/// Contains the parse tree produced by the parser
///
/// Submodules:
/// - ast: Node shapes, node types and tree introspection
pub mod ast;
