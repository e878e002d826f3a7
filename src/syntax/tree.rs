//! Arena-backed tree assembly.
//!
//! The grammar machine's callbacks drive a [`TreeBuilder`]: each creates one
//! node and pushes it, or closes open nodes. Open nodes live on a stack of
//! arena indices, innermost last. Operator precedence is resolved as nodes
//! arrive by rotating an ancestor's last child under the new node, so there
//! is no recursion and no backtracking.
//!
//! Once every statement is closed, [`TreeBuilder::into_root`] freezes the
//! arena into the owned [`crate::ast`] tree, checking node shapes on the way.

use crate::ast::{
    Assignment, BooleanLiteral, Declaration, FunctionCall, Group, Identifier, Node,
    NumberLiteral, Operator, Root, Statement, StringLiteral,
};
use crate::errors::{ParseError, Position};
use crate::lexer::{Lexeme, LexemeKind};

use super::operators::OperatorTable;

type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Statement,
    FunctionCall(String),
    Identifier(String),
    String(String),
    Number(f64),
    Boolean(bool),
    Operator { symbol: String, precedence: u8 },
    // Slots hold identifier nodes; `children` only ever holds the value.
    Declaration {
        identifier: Option<NodeId>,
        value_type: Option<NodeId>,
    },
    Assignment { identifier: Option<NodeId> },
    Group,
}

impl Kind {
    fn contains_children(&self) -> bool {
        !matches!(
            self,
            Kind::Identifier(_) | Kind::String(_) | Kind::Number(_) | Kind::Boolean(_)
        )
    }

    fn precedence(&self) -> Option<u8> {
        match self {
            Kind::Operator { precedence, .. } => Some(*precedence),
            _ => None,
        }
    }

    fn is_boundary(&self) -> bool {
        matches!(self, Kind::Group | Kind::FunctionCall(_))
    }
}

#[derive(Debug, Clone)]
struct Slot {
    kind: Kind,
    position: Position,
    children: Vec<NodeId>,
}

/// Mutable tree under construction; the context of the grammar machine.
#[derive(Debug)]
pub struct TreeBuilder {
    operators: OperatorTable,
    arena: Vec<Slot>,
    statements: Vec<NodeId>,
    stack: Vec<NodeId>,
    current: Option<Lexeme>,
    lookahead: Option<LexemeKind>,
}

impl TreeBuilder {
    pub fn new(operators: OperatorTable) -> Self {
        Self {
            operators,
            arena: Vec::new(),
            statements: Vec::new(),
            stack: Vec::new(),
            current: None,
            lookahead: None,
        }
    }

    /// Make `lexeme` the one callbacks act on, with the kind of the lexeme
    /// after it (whitespace excluded) as lookahead.
    pub fn feed(&mut self, lexeme: Lexeme, lookahead: Option<LexemeKind>) {
        self.current = Some(lexeme);
        self.lookahead = lookahead;
    }

    pub fn current(&self) -> Option<&Lexeme> {
        self.current.as_ref()
    }

    fn lexeme(&self) -> Result<&Lexeme, ParseError> {
        self.current.as_ref().ok_or(ParseError::MalformedNode {
            construct: "lexeme stream",
            position: Position::start(),
        })
    }

    fn unexpected(&self) -> ParseError {
        match self.lexeme() {
            Ok(lexeme) => ParseError::unexpected(lexeme),
            Err(err) => err,
        }
    }

    fn alloc(&mut self, kind: Kind, position: Position) -> NodeId {
        self.arena.push(Slot {
            kind,
            position,
            children: Vec::new(),
        });
        self.arena.len() - 1
    }

    fn create(&mut self, kind: Kind) -> Result<(), ParseError> {
        let position = self.lexeme()?.position();
        let id = self.alloc(kind, position);
        self.push(id)
    }

    // ------------------------------------------------------------------------
    // Node creation callbacks
    // ------------------------------------------------------------------------

    /// An identifier, or a function call when a `(` follows it.
    pub fn create_identifier(&mut self) -> Result<(), ParseError> {
        let name = self.lexeme()?.value.clone();
        if self.lookahead == Some(LexemeKind::ParenOpen) {
            self.create(Kind::FunctionCall(name))
        } else {
            self.create(Kind::Identifier(name))
        }
    }

    /// An identifier regardless of what follows, for declaration slots.
    pub fn create_bare_identifier(&mut self) -> Result<(), ParseError> {
        let name = self.lexeme()?.value.clone();
        self.create(Kind::Identifier(name))
    }

    pub fn create_string(&mut self) -> Result<(), ParseError> {
        let value = self.lexeme()?.value.clone();
        self.create(Kind::String(value))
    }

    pub fn create_number(&mut self) -> Result<(), ParseError> {
        let lexeme = self.lexeme()?;
        let value = lexeme
            .value
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                text: lexeme.text.clone(),
                position: lexeme.position(),
            })?;
        self.create(Kind::Number(value))
    }

    pub fn create_boolean(&mut self) -> Result<(), ParseError> {
        let value = self.lexeme()?.kind == LexemeKind::True;
        self.create(Kind::Boolean(value))
    }

    pub fn create_operator(&mut self) -> Result<(), ParseError> {
        let lexeme = self.lexeme()?;
        let symbol = lexeme.value.clone();
        let precedence = self
            .operators
            .precedence(&symbol)
            .ok_or_else(|| ParseError::UnknownOperator {
                symbol: symbol.clone(),
                position: lexeme.position(),
            })?;
        self.create(Kind::Operator { symbol, precedence })
    }

    pub fn create_declaration(&mut self) -> Result<(), ParseError> {
        self.create(Kind::Declaration {
            identifier: None,
            value_type: None,
        })
    }

    pub fn create_assignment(&mut self) -> Result<(), ParseError> {
        self.create(Kind::Assignment { identifier: None })
    }

    pub fn create_group(&mut self) -> Result<(), ParseError> {
        self.create(Kind::Group)
    }

    // ------------------------------------------------------------------------
    // Closing callbacks
    // ------------------------------------------------------------------------

    /// Pop the innermost open node.
    pub fn close_node(&mut self) -> Result<(), ParseError> {
        self.stack.pop().map(|_| ()).ok_or_else(|| self.unexpected())
    }

    /// Close everything up to and including the current statement. An open
    /// group or call on the way means a `)` is missing.
    pub fn close_statement(&mut self) -> Result<(), ParseError> {
        loop {
            let top = self.top().ok_or_else(|| self.unexpected())?;
            match &self.arena[top].kind {
                Kind::Statement => return self.close_node(),
                kind if kind.is_boundary() => return Err(self.unexpected()),
                _ => self.close_node()?,
            }
        }
    }

    /// Close everything up to and including the innermost group or call.
    pub fn close_group_or_function(&mut self) -> Result<(), ParseError> {
        loop {
            let top = self.top().ok_or_else(|| self.unexpected())?;
            match &self.arena[top].kind {
                kind if kind.is_boundary() => return self.close_node(),
                Kind::Statement => return Err(self.unexpected()),
                _ => self.close_node()?,
            }
        }
    }

    /// Close the current argument, leaving its function call open for the
    /// next one.
    pub fn close_argument(&mut self) -> Result<(), ParseError> {
        loop {
            let top = self.top().ok_or_else(|| self.unexpected())?;
            match &self.arena[top].kind {
                Kind::FunctionCall(_) => return Ok(()),
                Kind::Group | Kind::Statement => return Err(self.unexpected()),
                _ => self.close_node()?,
            }
        }
    }

    // ------------------------------------------------------------------------
    // Push and rotation
    // ------------------------------------------------------------------------

    fn top(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    /// Attach a freshly created node, rotating it into place first.
    fn push(&mut self, node: NodeId) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            let position = self.arena[node].position;
            let statement = self.alloc(Kind::Statement, position);
            self.statements.push(statement);
            self.stack.push(statement);
        }

        if self.arena[node].kind.contains_children() {
            for depth in (0..self.stack.len()).rev() {
                let ancestor = self.stack[depth];
                match self.should_replace_last_child(ancestor, node) {
                    Some(true) => {
                        if let Some(last) = self.arena[ancestor].children.pop() {
                            self.append(node, last)?;
                        }
                        self.stack.truncate(depth + 1);
                        break;
                    }
                    Some(false) => continue,
                    None => break,
                }
            }
        }

        let parent = self.top().ok_or_else(|| self.unexpected())?;
        self.append(parent, node)?;
        if self.arena[node].kind.contains_children() {
            self.stack.push(node);
        }
        Ok(())
    }

    /// Whether `node` should take over `ancestor`'s last child. `None` stops
    /// the walk up the stack; `Some(false)` moves on to the next ancestor.
    fn should_replace_last_child(&self, ancestor: NodeId, node: NodeId) -> Option<bool> {
        let last = *self.arena[ancestor].children.last()?;
        let ancestor = &self.arena[ancestor].kind;
        let last = &self.arena[last].kind;
        let new = &self.arena[node].kind;

        match (ancestor.precedence(), last.precedence(), new.precedence()) {
            (Some(over), _, Some(what)) => Some(what > over),
            (None, Some(over), Some(what)) => Some(what <= over),
            _ => match (new, last) {
                (Kind::Assignment { .. }, Kind::Identifier(_)) => Some(true),
                (Kind::Operator { .. }, last) if last.is_boundary() => Some(true),
                (Kind::Operator { .. }, last) if !last.contains_children() => Some(true),
                _ => None,
            },
        }
    }

    /// Append `child` to `parent`, filling identifier slots first.
    fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), ParseError> {
        let is_identifier = matches!(self.arena[child].kind, Kind::Identifier(_));
        let attached = match &mut self.arena[parent].kind {
            Kind::Declaration {
                identifier: slot @ None,
                ..
            }
            | Kind::Declaration {
                identifier: Some(_),
                value_type: slot @ None,
            }
            | Kind::Assignment {
                identifier: slot @ None,
            } => {
                if is_identifier {
                    *slot = Some(child);
                }
                is_identifier
            }
            _ => {
                self.arena[parent].children.push(child);
                true
            }
        };

        if attached {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // ------------------------------------------------------------------------
    // Freezing
    // ------------------------------------------------------------------------

    /// Convert the arena into the owned tree.
    pub fn into_root(self) -> Result<Root, ParseError> {
        let statements = self
            .statements
            .iter()
            .map(|&id| -> Result<Statement, ParseError> {
                let slot = &self.arena[id];
                Ok(Statement {
                    children: self.freeze_all(&slot.children)?,
                    position: slot.position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Root { statements })
    }

    /// Freeze the subtrees rooted at `ids` with an explicit post-order walk,
    /// so nesting depth is bounded by the heap rather than the call stack.
    fn freeze_all(&self, ids: &[NodeId]) -> Result<Vec<Node>, ParseError> {
        let mut pending: Vec<(NodeId, bool)> = ids.iter().rev().map(|&id| (id, false)).collect();
        let mut frozen: Vec<Node> = Vec::with_capacity(ids.len());

        while let Some((id, visited)) = pending.pop() {
            let children = &self.arena[id].children;
            if !visited {
                pending.push((id, true));
                pending.extend(children.iter().rev().map(|&child| (child, false)));
                continue;
            }

            // Every child left exactly one node on `frozen`, in order.
            let first = frozen.len().saturating_sub(children.len());
            let children = frozen.split_off(first);
            frozen.push(self.freeze(id, children)?);
        }

        Ok(frozen)
    }

    fn freeze_identifier(
        &self,
        id: Option<NodeId>,
        construct: &'static str,
        position: Position,
    ) -> Result<Identifier, ParseError> {
        let malformed = ParseError::MalformedNode { construct, position };
        let id = id.ok_or_else(|| malformed.clone())?;
        match &self.arena[id].kind {
            Kind::Identifier(name) => Ok(Identifier {
                name: name.clone(),
                position: self.arena[id].position,
            }),
            _ => Err(malformed),
        }
    }

    /// Build the node for `id` from its already frozen children.
    fn freeze(&self, id: NodeId, children: Vec<Node>) -> Result<Node, ParseError> {
        let slot = &self.arena[id];
        let position = slot.position;
        let malformed = |construct| ParseError::MalformedNode {
            construct,
            position,
        };

        let node = match &slot.kind {
            Kind::Identifier(name) => Node::Identifier(Identifier {
                name: name.clone(),
                position,
            }),
            Kind::String(value) => Node::String(StringLiteral {
                value: value.clone(),
                position,
            }),
            Kind::Number(value) => Node::Number(NumberLiteral {
                value: *value,
                position,
            }),
            Kind::Boolean(value) => Node::Boolean(BooleanLiteral {
                value: *value,
                position,
            }),
            Kind::FunctionCall(name) => Node::FunctionCall(FunctionCall {
                identifier: Identifier {
                    name: name.clone(),
                    position,
                },
                arguments: children,
                position,
            }),
            Kind::Operator { symbol, .. } => {
                if children.len() != 2 {
                    return Err(malformed("operator"));
                }
                Node::Operator(Operator {
                    symbol: symbol.clone(),
                    operands: children,
                    position,
                })
            }
            Kind::Declaration {
                identifier,
                value_type,
            } => {
                let Ok([value]) = <[Node; 1]>::try_from(children) else {
                    return Err(malformed("declaration"));
                };
                Node::Declaration(Declaration {
                    identifier: self.freeze_identifier(*identifier, "declaration", position)?,
                    value_type: self.freeze_identifier(*value_type, "declaration", position)?,
                    value: Box::new(value),
                    position,
                })
            }
            Kind::Assignment { identifier } => {
                if children.is_empty() {
                    return Err(malformed("assignment"));
                }
                Node::Assignment(Assignment {
                    identifier: self.freeze_identifier(*identifier, "assignment", position)?,
                    children,
                    position,
                })
            }
            Kind::Group => {
                let Ok([inner]) = <[Node; 1]>::try_from(children) else {
                    return Err(malformed("group"));
                };
                Node::Group(Group {
                    inner: Box::new(inner),
                    position,
                })
            }
            Kind::Statement => return Err(malformed("statement")),
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Action = fn(&mut TreeBuilder) -> Result<(), ParseError>;

    fn lexeme(kind: LexemeKind, text: &str, column: usize) -> Lexeme {
        Lexeme::new(kind, text, Position::new(1, column))
    }

    /// Feed `(kind, text, callback)` steps without a grammar machine.
    fn build(steps: &[(LexemeKind, &str, Action)]) -> Result<Root, ParseError> {
        let mut tree = TreeBuilder::new(OperatorTable::standard());
        for (i, (kind, text, action)) in steps.iter().enumerate() {
            let lookahead = steps.get(i + 1).map(|(kind, ..)| *kind);
            tree.feed(lexeme(*kind, text, i + 1), lookahead);
            action(&mut tree)?;
        }
        tree.into_root()
    }

    use LexemeKind as K;

    #[test]
    fn higher_precedence_nests_deeper() {
        let root = build(&[
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "+", TreeBuilder::create_operator),
            (K::Number, "2", TreeBuilder::create_number),
            (K::Operator, "*", TreeBuilder::create_operator),
            (K::Number, "3", TreeBuilder::create_number),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap();
        assert_eq!(root.pretty(), "(+ 1 (* 2 3));");
    }

    #[test]
    fn equal_precedence_chains_left() {
        let root = build(&[
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "-", TreeBuilder::create_operator),
            (K::Number, "2", TreeBuilder::create_number),
            (K::Operator, "+", TreeBuilder::create_operator),
            (K::Number, "3", TreeBuilder::create_number),
            (K::Operator, "-", TreeBuilder::create_operator),
            (K::Number, "4", TreeBuilder::create_number),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap();
        assert_eq!(root.pretty(), "(- (+ (- 1 2) 3) 4);");
    }

    #[test]
    fn closed_group_becomes_left_operand() {
        let root = build(&[
            (K::ParenOpen, "(", TreeBuilder::create_group),
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "+", TreeBuilder::create_operator),
            (K::Number, "2", TreeBuilder::create_number),
            (K::ParenClose, ")", TreeBuilder::close_group_or_function),
            (K::Operator, "*", TreeBuilder::create_operator),
            (K::Number, "3", TreeBuilder::create_number),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap();
        assert_eq!(root.pretty(), "(* [(+ 1 2)] 3);");
    }

    #[test]
    fn assignment_takes_over_identifier() {
        let root = build(&[
            (K::Identifier, "a", TreeBuilder::create_identifier),
            (K::Equals, "=", TreeBuilder::create_assignment),
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "+", TreeBuilder::create_operator),
            (K::Number, "2", TreeBuilder::create_number),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap();
        assert_eq!(root.pretty(), "(= a (+ 1 2));");
    }

    #[test]
    fn declaration_fills_slots_then_value() {
        let root = build(&[
            (K::Let, "let", TreeBuilder::create_declaration),
            (K::Identifier, "x", TreeBuilder::create_bare_identifier),
            (K::Identifier, "number", TreeBuilder::create_bare_identifier),
            (K::Number, "4", TreeBuilder::create_number),
            (K::Operator, "*", TreeBuilder::create_operator),
            (K::Number, "2", TreeBuilder::create_number),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap();
        assert_eq!(root.pretty(), "(let x number (* 4 2));");
    }

    #[test]
    fn declaration_rejects_literal_in_identifier_slot() {
        let err = build(&[
            (K::Let, "let", TreeBuilder::create_declaration),
            (K::Number, "5", TreeBuilder::create_number),
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { lexeme, .. } if lexeme.text == "5"));
    }

    #[test]
    fn argument_closes_back_to_call() {
        let root = build(&[
            (K::Identifier, "max", TreeBuilder::create_identifier),
            (K::ParenOpen, "(", |_| Ok(())),
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "+", TreeBuilder::create_operator),
            (K::Number, "2", TreeBuilder::create_number),
            (K::Comma, ",", TreeBuilder::close_argument),
            (K::Number, "3", TreeBuilder::create_number),
            (K::ParenClose, ")", TreeBuilder::close_group_or_function),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap();
        assert_eq!(root.pretty(), "(max (+ 1 2) 3);");
    }

    #[test]
    fn statement_close_inside_group_is_unexpected() {
        let err = build(&[
            (K::ParenOpen, "(", TreeBuilder::create_group),
            (K::Number, "1", TreeBuilder::create_number),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { lexeme, .. } if lexeme.column == 3));
    }

    #[test]
    fn unmatched_close_and_stray_comma_are_unexpected() {
        let err = build(&[
            (K::Number, "1", TreeBuilder::create_number),
            (K::ParenClose, ")", TreeBuilder::close_group_or_function),
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { lexeme, .. } if lexeme.text == ")"));

        let err = build(&[
            (K::Number, "1", TreeBuilder::create_number),
            (K::Comma, ",", TreeBuilder::close_argument),
        ])
        .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { lexeme, .. } if lexeme.text == ","));
    }

    #[test]
    fn invalid_number_and_unknown_operator() {
        let err = build(&[(K::Number, "1.2.3", TreeBuilder::create_number)]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                text: "1.2.3".into(),
                position: Position::new(1, 1),
            }
        );

        let err = build(&[
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "<>", TreeBuilder::create_operator),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOperator {
                symbol: "<>".into(),
                position: Position::new(1, 2),
            }
        );
    }

    #[test]
    fn incomplete_operator_is_malformed_when_frozen() {
        let err = build(&[
            (K::Number, "1", TreeBuilder::create_number),
            (K::Operator, "+", TreeBuilder::create_operator),
            (K::SemiColon, ";", TreeBuilder::close_statement),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedNode { construct: "operator", .. }
        ));
    }
}
