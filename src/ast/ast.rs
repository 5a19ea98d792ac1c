use std::fmt::Display;

use crate::lexer::tokens::Token;

/// Node Shapes
///
/// The physical layout of a node. A handful of shapes carry every construct of the
/// language; the construct itself is told apart by its `NodeType`.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeShape {
    Nullary,
    Unary,
    Binary,
    Trinary,
    Block,
}

impl Display for NodeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeShape::Nullary => "NullaryNode",
            NodeShape::Unary => "UnaryNode",
            NodeShape::Binary => "BinaryNode",
            NodeShape::Trinary => "TrinaryNode",
            NodeShape::Block => "BlockNode",
        };
        write!(f, "{}", name)
    }
}

/// Node Types
///
/// What a node represents in the program.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum NodeType {
    Program,
    Include,
    VarDec,
    VarRef,
    Assign,
    If,
    IfBranch,
    ElseBranch,
    While,
    For,
    Range,
    Struct,
    Type,
    FuncDef,
    FuncDec,
    FuncCall,
    ParamList,
    RunDirective,
    Number,
    Float,
    String,
    Identifier,
    Keyword,
    Vararg,
    List,
    Block,
    /// A binary operator application, `left op right`
    Binary,
}

impl NodeType {
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::Program => "PROGRAM",
            NodeType::Include => "INCLUDE",
            NodeType::VarDec => "VAR_DEC",
            NodeType::VarRef => "VAR_REF",
            NodeType::Assign => "ASSIGN",
            NodeType::If => "IF",
            NodeType::IfBranch => "IF_BRANCH",
            NodeType::ElseBranch => "ELSE_BRANCH",
            NodeType::While => "WHILE",
            NodeType::For => "FOR",
            NodeType::Range => "RANGE",
            NodeType::Struct => "STRUCT",
            NodeType::Type => "TYPE",
            NodeType::FuncDef => "FUNCDEF",
            NodeType::FuncDec => "FUNCDEC",
            NodeType::FuncCall => "FUNCCALL",
            NodeType::ParamList => "PARAM_LIST",
            NodeType::RunDirective => "RUN_DIRECTIVE",
            NodeType::Number => "NUMBER",
            NodeType::Float => "FLOAT",
            NodeType::String => "STRING",
            NodeType::Identifier => "IDENTIFIER",
            NodeType::Keyword => "KEYWORD",
            NodeType::Vararg => "VARARG",
            NodeType::List => "LIST",
            NodeType::Block => "BLOCK",
            NodeType::Binary => "BINARY",
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse Node
///
/// One variant per shape. Every node owns its children outright, so dropping a
/// node drops its whole subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Nullary {
        token: Token,
        represents: NodeType,
    },
    Unary {
        token: Token,
        represents: NodeType,
        child: Box<Node>,
        /// Path segments of a field access chain, empty otherwise
        lexemes: Vec<String>,
    },
    Binary {
        token: Token,
        represents: NodeType,
        left: Box<Node>,
        right: Box<Node>,
    },
    Trinary {
        token: Token,
        represents: NodeType,
        left: Box<Node>,
        middle: Box<Node>,
        right: Box<Node>,
    },
    Block {
        token: Token,
        represents: NodeType,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn nullary(token: Token, represents: NodeType) -> Self {
        Node::Nullary { token, represents }
    }

    pub fn unary(token: Token, represents: NodeType, child: Node) -> Self {
        Node::Unary {
            token,
            represents,
            child: Box::new(child),
            lexemes: vec![],
        }
    }

    /// A field access chain `a.b.c`: the head reference plus every segment.
    pub fn path(token: Token, head: Node, lexemes: Vec<String>) -> Self {
        Node::Unary {
            token,
            represents: NodeType::List,
            child: Box::new(head),
            lexemes,
        }
    }

    pub fn binary(token: Token, represents: NodeType, left: Node, right: Node) -> Self {
        Node::Binary {
            token,
            represents,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn trinary(
        token: Token,
        represents: NodeType,
        left: Node,
        middle: Node,
        right: Node,
    ) -> Self {
        Node::Trinary {
            token,
            represents,
            left: Box::new(left),
            middle: Box::new(middle),
            right: Box::new(right),
        }
    }

    pub fn block(token: Token, represents: NodeType, children: Vec<Node>) -> Self {
        Node::Block {
            token,
            represents,
            children,
        }
    }

    pub fn token(&self) -> &Token {
        match self {
            Node::Nullary { token, .. }
            | Node::Unary { token, .. }
            | Node::Binary { token, .. }
            | Node::Trinary { token, .. }
            | Node::Block { token, .. } => token,
        }
    }

    pub fn lexeme(&self) -> &str {
        &self.token().lexeme
    }

    pub fn line(&self) -> u32 {
        self.token().line()
    }

    pub fn represents(&self) -> NodeType {
        match self {
            Node::Nullary { represents, .. }
            | Node::Unary { represents, .. }
            | Node::Binary { represents, .. }
            | Node::Trinary { represents, .. }
            | Node::Block { represents, .. } => *represents,
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self {
            Node::Nullary { .. } => NodeShape::Nullary,
            Node::Unary { .. } => NodeShape::Unary,
            Node::Binary { .. } => NodeShape::Binary,
            Node::Trinary { .. } => NodeShape::Trinary,
            Node::Block { .. } => NodeShape::Block,
        }
    }

    /// Children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Nullary { .. } => vec![],
            Node::Unary { child, .. } => vec![child.as_ref()],
            Node::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::Trinary {
                left,
                middle,
                right,
                ..
            } => vec![left.as_ref(), middle.as_ref(), right.as_ref()],
            Node::Block { children, .. } => children.iter().collect(),
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index).copied()
    }

    /// The first child, if any.
    pub fn get_child_node(&self) -> Option<&Node> {
        self.child(0)
    }

    pub fn lexemes(&self) -> &[String] {
        match self {
            Node::Unary { lexemes, .. } => lexemes.as_slice(),
            _ => &[],
        }
    }

    /// `a.b.c` for a field access chain, the token lexeme for anything else.
    pub fn get_full_lexeme(&self) -> String {
        let lexemes = self.lexemes();
        if lexemes.is_empty() {
            return self.lexeme().to_string();
        }

        lexemes.join(".")
    }

    /// Source-like text of an expression subtree. Nested operators are
    /// parenthesized, so `1 - 2 - 3` renders as `(1 - 2) - 3`.
    pub fn expression_text(&self) -> String {
        match self {
            Node::Binary {
                token,
                represents: NodeType::Binary,
                left,
                right,
            } => format!(
                "{} {} {}",
                left.operand_text(),
                token.lexeme,
                right.operand_text()
            ),
            Node::Unary {
                token,
                represents: NodeType::FuncCall,
                child,
                ..
            } => {
                let arguments: Vec<String> = child
                    .children()
                    .iter()
                    .map(|argument| argument.expression_text())
                    .collect();
                format!("{}({})", token.lexeme, arguments.join(", "))
            }
            _ => self.get_full_lexeme(),
        }
    }

    fn operand_text(&self) -> String {
        if self.represents() == NodeType::Binary {
            format!("({})", self.expression_text())
        } else {
            self.expression_text()
        }
    }

    /// Number of nodes in the subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|child| child.size()).sum::<usize>()
    }

    /// Indented dump of the subtree, one `- TYPE 'lexeme'` line per node.
    pub fn show_tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("- {} '{}'\n", self.represents(), self.get_full_lexeme()));

        for child in self.children() {
            child.write_tree(out, depth + 1);
        }
    }
}

/// Single line summary, e.g. `BinaryNode{BINARY | + | NullaryNode{NUMBER | 1} | NullaryNode{NUMBER | 2}}`.
impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{{{} | {}",
            self.shape(),
            self.represents(),
            self.get_full_lexeme()
        )?;

        match self {
            Node::Block { children, .. } => write!(f, " | {} children", children.len())?,
            _ => {
                for child in self.children() {
                    write!(f, " | {}", child)?;
                }
            }
        }

        write!(f, "}}")
    }
}
