//! AST module for the Jaslang language
//!
//! The tree handed to consumers once a parse succeeds. It is plain owned data:
//! walk it, match on [`Node`], read fields. Nothing downstream mutates it.
//!
//! # Examples
//!
//! ```rust
//! use jaslang::ast::Node;
//! let root = jaslang::parse("1 * 2 + 3;").unwrap();
//! assert_eq!(root.statements.len(), 1);
//! assert!(matches!(&root.statements[0].children[0], Node::Operator(op) if op.symbol == "+"));
//! assert_eq!(root.pretty(), "(+ (* 1 2) 3);");
//! ```

// ============================================================================
// IMPORTS
// ============================================================================

use serde::Serialize;
use std::mem;
use std::slice;

use crate::errors::Position;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// The whole program: its statements in source order.
///
/// Dropping a root takes its nodes apart one level at a time, so arbitrarily
/// deep trees are freed without deep recursion.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Root {
    pub statements: Vec<Statement>,
}

/// One `;`-terminated statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub children: Vec<Node>,
    pub position: Position,
}

/// Every node that can appear inside a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    FunctionCall(FunctionCall),
    Identifier(Identifier),
    String(StringLiteral),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
    Operator(Operator),
    Declaration(Declaration),
    Assignment(Assignment),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub identifier: Identifier,
    pub arguments: Vec<Node>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub value: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLiteral {
    pub value: f64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub position: Position,
}

/// A binary operation; `operands` always holds exactly two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operator {
    pub symbol: String,
    pub operands: Vec<Node>,
    pub position: Position,
}

/// `let <identifier> <type> = <value>;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub identifier: Identifier,
    pub value_type: Identifier,
    pub value: Box<Node>,
    pub position: Position,
}

/// `<identifier> = <expression>;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub identifier: Identifier,
    pub children: Vec<Node>,
    pub position: Position,
}

/// A parenthesised expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub inner: Box<Node>,
    pub position: Position,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Node {
    pub fn position(&self) -> Position {
        match self {
            Node::FunctionCall(node) => node.position,
            Node::Identifier(node) => node.position,
            Node::String(node) => node.position,
            Node::Number(node) => node.position,
            Node::Boolean(node) => node.position,
            Node::Operator(node) => node.position,
            Node::Declaration(node) => node.position,
            Node::Assignment(node) => node.position,
            Node::Group(node) => node.position,
        }
    }

    /// The node's expression children. Identifier slots of declarations,
    /// assignments and calls are fields, not children.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::FunctionCall(call) => &call.arguments,
            Node::Operator(op) => &op.operands,
            Node::Declaration(decl) => slice::from_ref(decl.value.as_ref()),
            Node::Assignment(assign) => &assign.children,
            Node::Group(group) => slice::from_ref(group.inner.as_ref()),
            Node::Identifier(_) | Node::String(_) | Node::Number(_) | Node::Boolean(_) => &[],
        }
    }

    /// Compact prefix rendering, e.g. `(+ 1 (* 2 3))`.
    pub fn pretty(&self) -> String {
        match self {
            Node::Identifier(ident) => ident.name.clone(),
            Node::String(s) => format!("\"{}\"", s.value),
            Node::Number(n) => n.value.to_string(),
            Node::Boolean(b) => b.value.to_string(),
            Node::FunctionCall(call) => {
                let args = Self::pretty_list(&call.arguments);
                format!("({}{})", call.identifier.name, args)
            }
            Node::Operator(op) => format!("({}{})", op.symbol, Self::pretty_list(&op.operands)),
            Node::Declaration(decl) => format!(
                "(let {} {} {})",
                decl.identifier.name,
                decl.value_type.name,
                decl.value.pretty()
            ),
            Node::Assignment(assign) => format!(
                "(= {}{})",
                assign.identifier.name,
                Self::pretty_list(&assign.children)
            ),
            Node::Group(group) => format!("[{}]", group.inner.pretty()),
        }
    }

    fn pretty_list(nodes: &[Node]) -> String {
        nodes.iter().map(|n| format!(" {}", n.pretty())).collect()
    }

    /// Move this node's expression children into `out`, leaving it shallow.
    fn detach_children(&mut self, out: &mut Vec<Node>) {
        let hollow = || {
            Node::Boolean(BooleanLiteral {
                value: false,
                position: Position::start(),
            })
        };
        match self {
            Node::FunctionCall(call) => out.append(&mut call.arguments),
            Node::Operator(op) => out.append(&mut op.operands),
            Node::Assignment(assign) => out.append(&mut assign.children),
            Node::Declaration(decl) => out.push(mem::replace(decl.value.as_mut(), hollow())),
            Node::Group(group) => out.push(mem::replace(group.inner.as_mut(), hollow())),
            Node::Identifier(_) | Node::String(_) | Node::Number(_) | Node::Boolean(_) => {}
        }
    }
}

impl Statement {
    pub fn pretty(&self) -> String {
        let inner = self
            .children
            .iter()
            .map(Node::pretty)
            .collect::<Vec<_>>()
            .join(" ");
        format!("{inner};")
    }
}

impl Root {
    /// One pretty-printed statement per line.
    pub fn pretty(&self) -> String {
        self.statements
            .iter()
            .map(Statement::pretty)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        let mut pending: Vec<Node> = self
            .statements
            .iter_mut()
            .flat_map(|statement| mem::take(&mut statement.children))
            .collect();
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}
